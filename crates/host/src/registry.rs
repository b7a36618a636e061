// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared, lock-protected bookkeeping the host keeps about running workers.
//!
//! One registry backs every `Host` clone (the handle is `Arc`-cheap to
//! clone, matching the rest of the workspace's "pass a handle, not a
//! reference" convention). All mutation happens under `parking_lot::Mutex`
//! — critical sections here are pointer-chasing only, never an `.await`.

use crate::message::{ControlMsg, Envelope};
use crate::worker::WorkerIdentity;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use tend_core::{MonitorToken, WorkerHandle};
use tokio::sync::{mpsc, oneshot};

pub(crate) struct WorkerSlot {
    pub mailbox: mpsc::Sender<Envelope>,
    pub control: mpsc::Sender<ControlMsg>,
    pub identity: WorkerIdentity,
}

/// How many terminated workers' reasons are kept so a late `rpc` can report
/// *why* its peer is gone instead of a bare "no such worker". Bounded and
/// FIFO-evicted rather than retained forever — a long-lived host cycles
/// through far more workers than any one caller could still be holding a
/// stale handle for.
const TOMBSTONE_CAPACITY: usize = 4096;

#[derive(Default)]
pub(crate) struct RegistryInner {
    pub(crate) workers: HashMap<WorkerHandle, WorkerSlot>,
    pub(crate) monitors: HashMap<WorkerHandle, Vec<(MonitorToken, oneshot::Sender<String>)>>,
    pub(crate) links: HashMap<WorkerHandle, HashSet<WorkerHandle>>,
    pub(crate) tombstones: HashMap<WorkerHandle, String>,
    tombstone_order: VecDeque<WorkerHandle>,
}

/// Shared worker bookkeeping, guarded by a single lock.
#[derive(Default)]
pub(crate) struct Registry {
    pub(crate) inner: Mutex<RegistryInner>,
}

impl Registry {
    pub(crate) fn insert(&self, handle: WorkerHandle, slot: WorkerSlot) {
        self.inner.lock().workers.insert(handle, slot);
    }

    pub(crate) fn identity(&self, handle: WorkerHandle) -> Option<WorkerIdentity> {
        self.inner.lock().workers.get(&handle).map(|slot| slot.identity.clone())
    }

    pub(crate) fn mailbox(&self, handle: WorkerHandle) -> Option<mpsc::Sender<Envelope>> {
        self.inner.lock().workers.get(&handle).map(|slot| slot.mailbox.clone())
    }

    pub(crate) fn control(&self, handle: WorkerHandle) -> Option<mpsc::Sender<ControlMsg>> {
        self.inner.lock().workers.get(&handle).map(|slot| slot.control.clone())
    }

    pub(crate) fn is_alive(&self, handle: WorkerHandle) -> bool {
        self.inner.lock().workers.contains_key(&handle)
    }

    /// Register a one-shot liveness watch. If the worker is already gone,
    /// the receiver half fires immediately with a synthetic reason so
    /// callers never block on a subject that died before they asked.
    pub(crate) fn monitor(&self, handle: WorkerHandle) -> (MonitorToken, oneshot::Receiver<String>) {
        let token = MonitorToken::new();
        let (tx, rx) = oneshot::channel();
        let mut inner = self.inner.lock();
        if inner.workers.contains_key(&handle) {
            inner.monitors.entry(handle).or_default().push((token, tx));
        } else {
            let _ = tx.send("already_gone".to_string());
        }
        (token, rx)
    }

    /// Release a monitor registered via [`Self::monitor`] before the
    /// subject dies — e.g. an `rpc` call that got its reply and no longer
    /// needs to hear about the worker's eventual death. A no-op if the
    /// worker already died and drained its monitor list.
    pub(crate) fn demonitor(&self, handle: WorkerHandle, token: MonitorToken) {
        let mut inner = self.inner.lock();
        if let Some(watchers) = inner.monitors.get_mut(&handle) {
            watchers.retain(|(t, _)| *t != token);
            if watchers.is_empty() {
                inner.monitors.remove(&handle);
            }
        }
    }

    pub(crate) fn link(&self, a: WorkerHandle, b: WorkerHandle) {
        let mut inner = self.inner.lock();
        inner.links.entry(a).or_default().insert(b);
        inner.links.entry(b).or_default().insert(a);
    }

    /// Remove a worker and return everyone who needs to be told: the
    /// monitors waiting on it, and its linked peers (who must now die with
    /// the same reason). Records `reason` in the tombstone table so a
    /// subsequent `rpc` to this handle reports why its peer is gone rather
    /// than just that it no longer exists.
    pub(crate) fn remove(
        &self,
        handle: WorkerHandle,
        reason: &str,
    ) -> (Vec<(MonitorToken, oneshot::Sender<String>)>, Vec<WorkerHandle>) {
        let mut inner = self.inner.lock();
        inner.workers.remove(&handle);
        let watchers = inner.monitors.remove(&handle).unwrap_or_default();
        let linked = inner.links.remove(&handle).unwrap_or_default();
        for peer in &linked {
            if let Some(set) = inner.links.get_mut(peer) {
                set.remove(&handle);
            }
        }

        inner.tombstones.insert(handle, reason.to_string());
        inner.tombstone_order.push_back(handle);
        if inner.tombstone_order.len() > TOMBSTONE_CAPACITY {
            if let Some(oldest) = inner.tombstone_order.pop_front() {
                inner.tombstones.remove(&oldest);
            }
        }

        (watchers, linked.into_iter().collect())
    }

    /// The termination reason of a worker that has already been fully
    /// removed, if it's still within the tombstone window.
    pub(crate) fn tombstone_reason(&self, handle: WorkerHandle) -> Option<String> {
        self.inner.lock().tombstones.get(&handle).cloned()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
