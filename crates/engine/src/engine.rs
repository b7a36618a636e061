// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level facade: one handle onto both the worker host and the
//! injector running on top of it.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tend_core::{Clock, EngineError, Event, Item, ItemRef, Key, RpcFailure, SystemClock, WorkerHandle};
use tend_host::{Host, SpawnOptions, Worker};
use tend_injector::{tracing_sink, EventSink, Factory, FactoryId, Injector};

/// The engine: a cheap, cloneable handle combining a [`Host`] and the
/// [`Injector`] running on it. This is the surface a program embeds —
/// everything else in the workspace is a supporting crate.
#[derive(Clone)]
pub struct Engine {
    host: Host,
    injector: Injector,
    sink: EventSink,
    epoch_ms: Arc<dyn Fn() -> u64 + Send + Sync>,
}

impl Engine {
    /// Start a fresh engine: a new host and an injector loop on top of it,
    /// logging its event stream through `tracing`.
    pub fn start() -> Self {
        Self::start_with(tracing_sink(), SystemClock)
    }

    /// Start a fresh engine with an explicit event sink and clock — the
    /// hook integration tests use to capture the event stream and pin
    /// timestamps.
    pub fn start_with<C: Clock + 'static>(sink: EventSink, clock: C) -> Self {
        let host = Host::new();
        let injector = Injector::spawn_with(host.clone(), sink.clone(), clock.clone());
        let epoch_ms = Arc::new(move || clock.epoch_ms());
        Self { host, injector, sink, epoch_ms }
    }

    pub async fn add_factory(&self, factory: Factory) -> Result<(), EngineError> {
        self.injector.add_factory(factory).await
    }

    pub async fn remove_factory(&self, id: impl Into<FactoryId>) -> Result<(), EngineError> {
        self.injector.remove_factory(id).await
    }

    /// Construct an item under `key` and push it; revoked only by an
    /// explicit [`Self::withdraw`].
    pub async fn push(&self, key: impl Into<Key>, value: impl Any + Send + Sync) -> Result<Item, EngineError> {
        self.injector.push(key, value).await
    }

    /// Like [`Self::push`], but the item is revoked automatically if
    /// `owner` dies.
    pub async fn push_owned(
        &self,
        key: impl Into<Key>,
        value: impl Any + Send + Sync,
        owner: WorkerHandle,
    ) -> Result<Item, EngineError> {
        self.injector.push_owned(key, value, owner).await
    }

    pub async fn push_item(&self, item: Item) -> Result<(), EngineError> {
        self.injector.push_item(item).await
    }

    pub async fn withdraw(&self, item_ref: ItemRef, reason: impl Into<String>) {
        self.injector.withdraw(item_ref, reason).await
    }

    pub async fn monitor_item(&self, item_ref: ItemRef) -> tokio::sync::oneshot::Receiver<String> {
        self.injector.monitor_item(item_ref).await
    }

    /// Spawn a worker directly on the host, bypassing the injector — for
    /// callers that manage their own lifetime rather than going through a
    /// factory (e.g. the engine's own bootstrap workers).
    pub async fn spawn<W, F, Fut>(
        &self,
        module: &'static str,
        args: impl std::fmt::Debug,
        make: F,
        opts: SpawnOptions,
    ) -> Result<WorkerHandle, EngineError>
    where
        W: Worker,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<W, String>> + Send + 'static,
    {
        self.host.spawn(module, args, make, opts).await
    }

    pub async fn rpc(
        &self,
        handle: WorkerHandle,
        msg: impl Any + Send,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn Any + Send>, RpcFailure> {
        let result = self.host.rpc(handle, msg, timeout).await;
        if let Err(ref failure) = result {
            (self.sink)(Event::RpcFailed {
                worker: handle,
                reason: failure.to_string(),
                epoch_ms: (self.epoch_ms)(),
            });
        }
        result
    }

    pub async fn cast(&self, handle: WorkerHandle, msg: impl Any + Send) {
        self.host.cast(handle, msg).await
    }

    pub fn is_alive(&self, handle: WorkerHandle) -> bool {
        self.host.is_alive(handle)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
