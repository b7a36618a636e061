// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker host: spawning, message dispatch, RPC, and liveness.

use crate::message::{ControlMsg, Envelope, ReplyHandle, Transition};
use crate::registry::{Registry, WorkerSlot};
use crate::worker::{Worker, WorkerIdentity};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tend_core::{EngineError, MonitorToken, RpcFailure, WorkerHandle};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

/// Default bound on how long a worker's `create_initial_state` may run
/// before the spawn is abandoned.
pub const DEFAULT_SPAWN_TIMEOUT: Duration = Duration::from_millis(500);

const MAILBOX_CAPACITY: usize = 64;
const CONTROL_CAPACITY: usize = 8;

/// Options controlling one `spawn` call.
#[derive(Debug, Clone, Default)]
pub struct SpawnOptions {
    /// When set, the new worker and the named peer die together: either
    /// one's termination kills the other with the same reason.
    pub link: Option<WorkerHandle>,
    /// Bound on `create_initial_state`. Defaults to [`DEFAULT_SPAWN_TIMEOUT`].
    pub timeout: Option<Duration>,
}

impl SpawnOptions {
    pub fn linked_to(handle: WorkerHandle) -> Self {
        Self { link: Some(handle), timeout: None }
    }

    fn timeout_or_default(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_SPAWN_TIMEOUT)
    }
}

/// The worker host. Cheap to clone — every clone shares the same
/// underlying registry, matching the rest of the workspace's "pass a
/// handle" convention for shared mutable state.
#[derive(Clone, Default)]
pub struct Host {
    registry: Arc<Registry>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a worker.
    ///
    /// `make` plays the role of the source's `create_initial_state/1`: it
    /// is invoked once, inside the new worker's own task, and the caller
    /// blocks until it resolves or `opts.timeout` elapses. On timeout the
    /// nascent task is aborted and no worker handle is ever observable.
    pub async fn spawn<W, F, Fut>(
        &self,
        module: &'static str,
        start_args: impl std::fmt::Debug,
        make: F,
        opts: SpawnOptions,
    ) -> Result<WorkerHandle, EngineError>
    where
        W: Worker,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<W, String>> + Send + 'static,
    {
        let handle = WorkerHandle::new();
        let start_args = format!("{start_args:?}");
        let (mailbox_tx, mailbox_rx) = mpsc::channel::<Envelope>(MAILBOX_CAPACITY);
        let (control_tx, control_rx) = mpsc::channel::<ControlMsg>(CONTROL_CAPACITY);
        let (init_tx, init_rx) = oneshot::channel::<Result<(), String>>();

        let registry = self.registry.clone();
        let task_handle = handle;
        let task_module = module;
        let task_args = start_args.clone();
        let join = tokio::spawn(async move {
            let worker = match make().await {
                Ok(w) => w,
                Err(reason) => {
                    let _ = init_tx.send(Err(reason));
                    return;
                }
            };
            if init_tx.send(Ok(())).is_err() {
                // Caller gave up (timed out); nothing left to report to.
                return;
            }
            run_worker(
                registry,
                task_handle,
                task_module,
                task_args,
                worker,
                mailbox_rx,
                control_rx,
            )
            .await;
        });

        match tokio::time::timeout(opts.timeout_or_default(), init_rx).await {
            Ok(Ok(Ok(()))) => {
                self.registry.insert(
                    handle,
                    WorkerSlot {
                        mailbox: mailbox_tx,
                        control: control_tx,
                        identity: WorkerIdentity {
                            module,
                            current_fn: "handle".to_string(),
                            start_args,
                        },
                    },
                );
                if let Some(peer) = opts.link {
                    self.registry.link(handle, peer);
                }
                Ok(handle)
            }
            Ok(Ok(Err(reason))) => Err(EngineError::SpawnInitFailed(reason)),
            Ok(Err(_recv_dropped)) => Err(EngineError::SpawnInitFailed("worker task panicked during init".into())),
            Err(_elapsed) => {
                join.abort();
                Err(EngineError::SpawnTimeout)
            }
        }
    }

    /// Send a request and block for a reply, a worker death, or the
    /// timeout — whichever comes first.
    pub async fn rpc(
        &self,
        handle: WorkerHandle,
        msg: impl std::any::Any + Send,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn std::any::Any + Send>, RpcFailure> {
        let Some(mailbox) = self.registry.mailbox(handle) else {
            return Err(match self.registry.tombstone_reason(handle) {
                Some(reason) => RpcFailure::ExitBeforeReply { reason },
                None => RpcFailure::NoSuchWorker,
            });
        };
        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = Envelope { payload: Box::new(msg), reply: ReplyHandle::new(reply_tx) };
        if mailbox.send(envelope).await.is_err() {
            return Err(RpcFailure::ExitBeforeReply { reason: "mailbox closed".to_string() });
        }

        let (token, death_rx) = self.registry.monitor(handle);
        tokio::pin!(death_rx);
        tokio::pin!(reply_rx);
        let sleep = sleep_or_pending(timeout);
        tokio::pin!(sleep);

        let outcome = tokio::select! {
            biased;
            reply = &mut reply_rx => {
                reply.map_err(|_| RpcFailure::ExitBeforeReply { reason: "worker dropped reply".to_string() })
            }
            death = &mut death_rx => {
                let reason = death.unwrap_or_else(|_| "unknown".to_string());
                Err(RpcFailure::ExitBeforeReply { reason })
            }
            _ = &mut sleep => Err(RpcFailure::Timeout),
        };
        // Release the monitor on every branch — on timeout in particular
        // (spec §5), the worker may run for arbitrarily long afterward and
        // this call must not keep accruing a dangling watcher for it.
        self.registry.demonitor(handle, token);
        outcome
    }

    /// Fire-and-forget send. The worker's `handle` still receives a reply
    /// continuation (for contract uniformity) but anything sent through it
    /// is discarded.
    pub async fn cast(&self, handle: WorkerHandle, msg: impl std::any::Any + Send) {
        let Some(mailbox) = self.registry.mailbox(handle) else {
            debug!(%handle, "cast to unknown worker dropped");
            return;
        };
        let envelope = Envelope { payload: Box::new(msg), reply: ReplyHandle::discarded() };
        if mailbox.send(envelope).await.is_err() {
            debug!(%handle, "cast dropped: worker gone before delivery");
        }
    }

    /// Install a one-shot liveness watch. Fires immediately with a
    /// synthetic reason if the worker is already gone.
    pub fn monitor(&self, handle: WorkerHandle) -> (MonitorToken, oneshot::Receiver<String>) {
        self.registry.monitor(handle)
    }

    pub fn is_alive(&self, handle: WorkerHandle) -> bool {
        self.registry.is_alive(handle)
    }

    pub fn identity(&self, handle: WorkerHandle) -> Option<WorkerIdentity> {
        self.registry.identity(handle)
    }

    /// Ask the live worker task for its current identity, rather than the
    /// registry's last-known copy — exercises the sys-debug control path.
    pub async fn whoami(&self, handle: WorkerHandle) -> Option<WorkerIdentity> {
        let control = self.registry.control(handle)?;
        let (tx, rx) = oneshot::channel();
        control.send(ControlMsg::WhoAmI(tx)).await.ok()?;
        rx.await.ok()
    }

    /// Request tracing be toggled for a running worker (sys-debug style
    /// control message; never reaches the worker's `handle`).
    pub async fn set_trace(&self, handle: WorkerHandle, enabled: bool) {
        if let Some(control) = self.registry.control(handle) {
            let _ = control.send(ControlMsg::SetTrace(enabled)).await;
        }
    }

    /// Forcibly terminate a worker, e.g. because its inputs were revoked.
    /// Best-effort: if the worker already exited this is a no-op.
    pub async fn kill(&self, handle: WorkerHandle, reason: impl Into<String>) {
        if let Some(control) = self.registry.control(handle) {
            let _ = control.send(ControlMsg::Kill(reason.into())).await;
        }
    }
}

async fn sleep_or_pending(timeout: Option<Duration>) {
    match timeout {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}

async fn run_worker<W: Worker>(
    registry: Arc<Registry>,
    handle: WorkerHandle,
    module: &'static str,
    start_args: String,
    mut worker: W,
    mut mailbox: mpsc::Receiver<Envelope>,
    mut control: mpsc::Receiver<ControlMsg>,
) {
    worker.started().await;
    trace!(%handle, module, "worker started");

    let reason = loop {
        tokio::select! {
            biased;
            ctl = control.recv() => {
                match ctl {
                    Some(ControlMsg::Kill(reason)) => break reason,
                    Some(ControlMsg::SetTrace(enabled)) => {
                        trace!(%handle, enabled, "trace toggled");
                    }
                    Some(ControlMsg::WhoAmI(reply)) => {
                        let _ = reply.send(WorkerIdentity {
                            module,
                            current_fn: worker.current_fn().to_string(),
                            start_args: start_args.clone(),
                        });
                    }
                    None => break "control channel closed".to_string(),
                }
            }
            msg = mailbox.recv() => {
                match msg {
                    Some(envelope) => match worker.handle(envelope).await {
                        Transition::Continue => {}
                        Transition::Exit(reason) => break reason,
                    },
                    None => break "mailbox closed".to_string(),
                }
            }
        }
    };

    // Best-effort per the worker contract: a panic inside `stopped` is not
    // caught here (the host carries no `FutureExt::catch_unwind` helper),
    // so a misbehaving hook can only fail itself, not the teardown below.
    worker.stopped(&reason).await;

    let (watchers, linked) = registry.remove(handle, &reason);
    for (_, tx) in watchers {
        let _ = tx.send(reason.clone());
    }
    for peer in linked {
        if let Some(control) = registry.control(peer) {
            let _ = control.send(ControlMsg::Kill(reason.clone())).await;
        }
    }
    trace!(%handle, module, reason, "worker stopped");
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
