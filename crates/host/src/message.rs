// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mailbox message shapes.

use std::any::Any;
use tokio::sync::oneshot;
use tracing::debug;

/// A type-erased payload. Workers downcast to whatever concrete message
/// type their factory agreed on with its callers.
pub type Payload = Box<dyn Any + Send>;

/// The continuation a worker invokes to answer an `rpc` call.
///
/// For a `cast`-delivered envelope the receiving half has already been
/// dropped; `reply` on such a handle is a silent no-op (traced at debug
/// level), matching the host's fire-and-forget contract.
pub struct ReplyHandle {
    sender: Option<oneshot::Sender<Payload>>,
}

impl ReplyHandle {
    pub(crate) fn new(sender: oneshot::Sender<Payload>) -> Self {
        Self { sender: Some(sender) }
    }

    pub(crate) fn discarded() -> Self {
        Self { sender: None }
    }

    /// Invoke the reply continuation. Invoking it more than once, or on a
    /// `cast` envelope, is accepted and simply discarded.
    pub fn reply(mut self, payload: impl Any + Send) {
        if let Some(sender) = self.sender.take() {
            if sender.send(Box::new(payload)).is_err() {
                debug!("rpc reply discarded: caller already gone");
            }
        } else {
            debug!("rpc reply discarded: cast envelope has no waiting caller");
        }
    }
}

/// One inbound message delivered to a worker's `handle`.
pub struct Envelope {
    pub payload: Payload,
    pub reply: ReplyHandle,
}

impl Envelope {
    /// Downcast the payload, consuming the envelope's reply handle along
    /// with it so callers can't accidentally reply twice to two different
    /// typed views of the same message.
    pub fn downcast<T: 'static>(self) -> Result<(Box<T>, ReplyHandle), Self> {
        match self.payload.downcast::<T>() {
            Ok(payload) => Ok((payload, self.reply)),
            Err(payload) => Err(Envelope { payload, reply: self.reply }),
        }
    }
}

/// What a worker's `handle` call decides after dispatching one message.
pub enum Transition {
    /// Keep running; the next message is delivered as usual.
    Continue,
    /// Terminate gracefully with the given reason.
    Exit(String),
}

/// System-level control messages. These never reach [`crate::worker::Worker::handle`] —
/// the host's message loop intercepts and answers them directly, mirroring
/// the source's sys-debug message handling.
pub(crate) enum ControlMsg {
    SetTrace(bool),
    WhoAmI(oneshot::Sender<crate::worker::WorkerIdentity>),
    /// Forces immediate termination with the given reason, bypassing the
    /// worker's own `handle` — used for cascading teardown and for killing
    /// linked peers.
    Kill(String),
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
