// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker module contract.
//!
//! A worker is whatever struct a factory's `start` recipe produces. The
//! host drives it through one required hook (`handle`) and two optional
//! lifecycle hooks (`started`, `stopped`). State-function dispatch (the
//! source's `(fn, data)` pair, reassigned on every transition) is an
//! implementation detail of the worker itself — it mutates its own fields
//! from inside `handle`, so the enumerated states live in an ordinary enum
//! rather than behind a symbolic/reflective lookup.

use crate::message::{Envelope, Transition};
use async_trait::async_trait;

/// Implemented by whatever a factory's `start` recipe constructs.
///
/// `handle` is invoked once per inbound message (both `cast` and `rpc`
/// deliveries arrive here — the difference is invisible to the worker,
/// which always gets an [`Envelope`] it can reply through or ignore).
#[async_trait]
pub trait Worker: Send + 'static {
    /// Dispatch one inbound message, returning whether the worker keeps
    /// running or should terminate.
    async fn handle(&mut self, envelope: Envelope) -> Transition;

    /// Called once, after the host has registered the worker but before
    /// any user message is delivered. Errors here are not supported —
    /// initialization failure belongs in the factory's `create_initial_state`
    /// step, which runs before the worker exists at all.
    async fn started(&mut self) {}

    /// Called best-effort before teardown, after the termination reason
    /// has already been decided. A panic here is not caught by the host —
    /// it can only fail the hook itself, not the teardown that follows it.
    async fn stopped(&mut self, _reason: &str) {}

    /// Name of the state-function the worker is currently dispatching
    /// through, for identity/debugging purposes. Workers that don't model
    /// multiple states can leave the default.
    fn current_fn(&self) -> &'static str {
        "handle"
    }
}

/// Inspectable identity metadata the host keeps for every running worker,
/// analogous to the source's per-task process dictionary entry.
#[derive(Debug, Clone)]
pub struct WorkerIdentity {
    pub module: &'static str,
    pub current_fn: String,
    pub start_args: String,
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
