// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared across the host, injector, and engine crates.
//!
//! Every public call in the workspace returns `Result<_, EngineError>`. The
//! variants are kinds, not exception hierarchies — callers match on them,
//! they don't downcast.

use thiserror::Error;

/// Why an in-flight `rpc()` failed to produce a reply.
///
/// A worker dying, a timeout firing, and calling an unknown handle are all
/// distinguishable failure modes of the same operation, so they share one
/// type rather than three unrelated error paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcFailure {
    /// The worker terminated before invoking the reply continuation.
    #[error("worker exited before replying: {reason}")]
    ExitBeforeReply { reason: String },

    /// The caller-specified (or default) timeout elapsed first.
    #[error("rpc timed out")]
    Timeout,

    /// The handle does not name a currently running worker.
    #[error("no such worker")]
    NoSuchWorker,
}

/// Uniform error kind for every public operation in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("factory {0} is already registered")]
    AlreadyAdded(String),

    #[error("factory {0} not found")]
    NotFound(String),

    #[error("invalid factory: {0}")]
    InvalidFactory(String),

    #[error("worker failed to initialize within the spawn timeout")]
    SpawnTimeout,

    #[error("worker init failed: {0}")]
    SpawnInitFailed(String),

    #[error("rpc timed out")]
    RpcTimeout,

    #[error("rpc peer is down: {0}")]
    RpcPeerDown(String),

    #[error("rpc target is not a worker")]
    RpcNotAWorker,
}

impl From<RpcFailure> for EngineError {
    fn from(failure: RpcFailure) -> Self {
        match failure {
            RpcFailure::ExitBeforeReply { reason } => EngineError::RpcPeerDown(reason),
            RpcFailure::Timeout => EngineError::RpcTimeout,
            RpcFailure::NoSuchWorker => EngineError::RpcNotAWorker,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
