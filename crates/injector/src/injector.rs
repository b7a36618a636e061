// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The injector (C7): the serialized coordinator that owns the factory
//! registry, item table, and active set, and runs the matcher.
//!
//! Mirrors the worker host's own shape: a cheap, cloneable handle in front
//! of a single task that owns all the mutable state and processes one
//! command at a time off an mpsc channel. Every public method here is a
//! send-then-await-a-oneshot-reply around that task, so callers never
//! touch the registries directly and the serial-processing guarantee in
//! the design notes falls out of the channel rather than a lock.

use crate::active_set::{ActiveEntry, ActiveSet};
use crate::event_sink::{tracing_sink, EventSink};
use crate::factory::{Factory, FactoryId};
use crate::factory_registry::FactoryRegistry;
use crate::item_table::ItemTable;
use crate::matcher::candidate_tuples;
use std::any::Any;
use tend_core::{Clock, EngineError, Event, Item, ItemRef, Key, SystemClock, WorkerHandle};
use tend_host::Host;
use tokio::sync::{mpsc, oneshot};

const COMMAND_CAPACITY: usize = 256;

enum Command {
    AddFactory { factory: Factory, reply: oneshot::Sender<Result<(), EngineError>> },
    RemoveFactory { id: FactoryId, reply: oneshot::Sender<Result<(), EngineError>> },
    PushItem { item: Item, reply: oneshot::Sender<Result<(), EngineError>> },
    Withdraw { item_ref: ItemRef, reason: String, reply: oneshot::Sender<()> },
    MonitorItem { item_ref: ItemRef, reply: oneshot::Sender<oneshot::Receiver<String>> },
    ItemDown { item_ref: ItemRef, reason: String },
    WorkerDown { handle: WorkerHandle, reason: String },
}

/// A cheap handle onto a running injector task. Clone freely; every clone
/// talks to the same underlying loop.
#[derive(Clone)]
pub struct Injector {
    tx: mpsc::Sender<Command>,
}

impl Injector {
    /// Start a new injector loop on top of `host`, logging its event
    /// stream through `tracing`.
    pub fn spawn(host: Host) -> Self {
        Self::spawn_with(host, tracing_sink(), SystemClock)
    }

    /// Start a new injector loop with an explicit event sink and clock —
    /// the hook the test suite uses to capture events and pin timestamps.
    pub fn spawn_with<C: Clock + 'static>(host: Host, sink: EventSink, clock: C) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let loop_tx = tx.clone();
        tokio::spawn(run(host, sink, clock, rx, loop_tx));
        Self { tx }
    }

    pub async fn add_factory(&self, factory: Factory) -> Result<(), EngineError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(Command::AddFactory { factory, reply }).await;
        rx.await.unwrap_or(Err(EngineError::NotFound("injector loop gone".to_string())))
    }

    pub async fn remove_factory(&self, id: impl Into<FactoryId>) -> Result<(), EngineError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(Command::RemoveFactory { id: id.into(), reply }).await;
        rx.await.unwrap_or(Err(EngineError::NotFound("injector loop gone".to_string())))
    }

    /// Push an already-constructed item (e.g. one carrying an owner).
    pub async fn push_item(&self, item: Item) -> Result<(), EngineError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(Command::PushItem { item, reply }).await;
        rx.await.unwrap_or(Err(EngineError::NotFound("injector loop gone".to_string())))
    }

    /// Construct an item under `key` and push it, owned by the caller
    /// (caller here means "nobody" unless `push_owned` is used — the item
    /// only dies via explicit `withdraw`).
    pub async fn push(&self, key: impl Into<Key>, value: impl Any + Send + Sync) -> Result<Item, EngineError> {
        let item = Item::new(key, value);
        self.push_item(item.clone()).await?;
        Ok(item)
    }

    /// Like [`Self::push`], but the item is revoked automatically if
    /// `owner` dies.
    pub async fn push_owned(
        &self,
        key: impl Into<Key>,
        value: impl Any + Send + Sync,
        owner: WorkerHandle,
    ) -> Result<Item, EngineError> {
        let item = Item::with_owner(key, value, owner);
        self.push_item(item.clone()).await?;
        Ok(item)
    }

    pub async fn withdraw(&self, item_ref: ItemRef, reason: impl Into<String>) {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(Command::Withdraw { item_ref, reason: reason.into(), reply }).await;
        let _ = rx.await;
    }

    /// Install a one-shot liveness watch on an item — fires immediately
    /// with a synthetic reason if the item is already gone.
    pub async fn monitor_item(&self, item_ref: ItemRef) -> oneshot::Receiver<String> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(Command::MonitorItem { item_ref, reply }).await;
        rx.await.unwrap_or_else(|_| {
            let (tx, rx) = oneshot::channel();
            let _ = tx.send("injector loop gone".to_string());
            rx
        })
    }
}

struct State<C: Clock> {
    host: Host,
    sink: EventSink,
    clock: C,
    factories: FactoryRegistry,
    items: ItemTable,
    active: ActiveSet,
    item_watchers: std::collections::HashMap<ItemRef, Vec<oneshot::Sender<String>>>,
    self_tx: mpsc::Sender<Command>,
}

async fn run<C: Clock + 'static>(
    host: Host,
    sink: EventSink,
    clock: C,
    mut rx: mpsc::Receiver<Command>,
    self_tx: mpsc::Sender<Command>,
) {
    let mut state =
        State { host, sink, clock, factories: FactoryRegistry::default(), items: ItemTable::default(), active: ActiveSet::default(), item_watchers: Default::default(), self_tx };

    while let Some(command) = rx.recv().await {
        match command {
            Command::AddFactory { factory, reply } => {
                let result = handle_add_factory(&mut state, factory).await;
                let _ = reply.send(result);
            }
            Command::RemoveFactory { id, reply } => {
                let result = handle_remove_factory(&mut state, id);
                let _ = reply.send(result);
            }
            Command::PushItem { item, reply } => {
                let result = handle_push_item(&mut state, item).await;
                let _ = reply.send(result);
            }
            Command::Withdraw { item_ref, reason, reply } => {
                handle_item_down(&mut state, item_ref, reason).await;
                let _ = reply.send(());
            }
            Command::MonitorItem { item_ref, reply } => {
                let (tx, rx) = oneshot::channel();
                if state.items.get(item_ref).is_some() {
                    state.item_watchers.entry(item_ref).or_default().push(tx);
                } else {
                    let _ = tx.send("already_gone".to_string());
                }
                let _ = reply.send(rx);
            }
            Command::ItemDown { item_ref, reason } => {
                handle_item_down(&mut state, item_ref, reason).await;
            }
            Command::WorkerDown { handle, reason } => {
                handle_worker_down(&mut state, handle, reason).await;
            }
        }
    }
}

async fn handle_add_factory<C: Clock>(state: &mut State<C>, factory: Factory) -> Result<(), EngineError> {
    let id = factory.id.clone();
    let for_matching = factory.clone();
    state.factories.add(factory)?;
    (state.sink)(Event::FactoryAdded { factory_id: id.to_string(), epoch_ms: state.clock.epoch_ms() });
    run_matcher(state, &for_matching).await;
    Ok(())
}

fn handle_remove_factory<C: Clock>(state: &mut State<C>, id: FactoryId) -> Result<(), EngineError> {
    state.factories.remove(&id)?;
    (state.sink)(Event::FactoryRemoved { factory_id: id.to_string(), epoch_ms: state.clock.epoch_ms() });
    Ok(())
}

async fn handle_push_item<C: Clock>(state: &mut State<C>, item: Item) -> Result<(), EngineError> {
    let key = item.key().clone();
    let item_ref = item.item_ref();
    let owner = item.owner();
    state.items.insert(item);
    (state.sink)(Event::ItemPushed { key: key.clone(), item_ref, epoch_ms: state.clock.epoch_ms() });

    if let Some(owner) = owner {
        watch_owner(state, owner, item_ref);
    }

    let dependants: Vec<Factory> = state.factories.depending_on(&key).into_iter().cloned().collect();
    for factory in dependants {
        run_matcher(state, &factory).await;
    }
    Ok(())
}

/// Re-run the matcher for one factory: enumerate candidates, skip anything
/// already active, spawn the rest in enumeration order.
async fn run_matcher<C: Clock>(state: &mut State<C>, factory: &Factory) {
    let candidates = candidate_tuples(factory, &state.items);
    for tuple in candidates {
        let tuple_refs: Vec<ItemRef> = tuple.iter().map(Item::item_ref).collect();
        if state.active.contains(&factory.id, &tuple_refs) {
            continue;
        }
        spawn_candidate(state, factory, tuple, tuple_refs).await;
    }
}

async fn spawn_candidate<C: Clock>(
    state: &mut State<C>,
    factory: &Factory,
    tuple: Vec<Item>,
    tuple_refs: Vec<ItemRef>,
) {
    (state.sink)(Event::ChildStarting {
        factory_id: factory.id.to_string(),
        tuple: tuple_refs.clone(),
        epoch_ms: state.clock.epoch_ms(),
    });

    let dependencies: Vec<(Key, Item)> = factory.requires.iter().cloned().zip(tuple).collect();
    match factory.start(state.host.clone(), dependencies).await {
        Ok(handle) => {
            let (monitor, death_rx) = state.host.monitor(handle);
            spawn_worker_watcher(state, handle, death_rx);
            state.active.put(factory.id.clone(), tuple_refs.clone(), ActiveEntry { worker: handle, monitor });
            (state.sink)(Event::ChildStarted {
                factory_id: factory.id.to_string(),
                tuple: tuple_refs,
                worker: handle,
                epoch_ms: state.clock.epoch_ms(),
            });
        }
        Err(reason) => {
            (state.sink)(Event::ChildStopped {
                factory_id: factory.id.to_string(),
                tuple: tuple_refs,
                worker: None,
                reason,
                epoch_ms: state.clock.epoch_ms(),
            });
        }
    }
}

fn spawn_worker_watcher<C: Clock>(state: &State<C>, handle: WorkerHandle, death_rx: oneshot::Receiver<String>) {
    let cmd_tx = state.self_tx.clone();
    tokio::spawn(async move {
        let reason = death_rx.await.unwrap_or_else(|_| "unknown".to_string());
        let _ = cmd_tx.send(Command::WorkerDown { handle, reason }).await;
    });
}

fn watch_owner<C: Clock>(state: &State<C>, owner: WorkerHandle, item_ref: ItemRef) {
    let (_, death_rx) = state.host.monitor(owner);
    let cmd_tx = state.self_tx.clone();
    tokio::spawn(async move {
        let reason = death_rx.await.unwrap_or_else(|_| "owner gone".to_string());
        let _ = cmd_tx.send(Command::ItemDown { item_ref, reason }).await;
    });
}

/// An item died — by explicit withdraw or its owner's death. Remove it
/// from the table, fire its watchers, and cascade into every active entry
/// whose tuple named it (C5.`entries_involving`). No other factory is
/// re-matched: revocation never starts new workers (P5).
async fn handle_item_down<C: Clock>(state: &mut State<C>, item_ref: ItemRef, reason: String) {
    let Some(item) = state.items.remove(item_ref) else {
        // Already gone (e.g. a withdraw racing a prior cascade); nothing
        // left to revoke or to tell.
        return;
    };
    (state.sink)(Event::ItemRevoked { key: item.key().clone(), item_ref, reason: reason.clone(), epoch_ms: state.clock.epoch_ms() });

    if let Some(watchers) = state.item_watchers.remove(&item_ref) {
        for tx in watchers {
            let _ = tx.send(reason.clone());
        }
    }

    let dependents = state.active.entries_involving(item_ref);
    for (factory_id, tuple) in dependents {
        stop_entry(state, &factory_id, &tuple, reason.clone()).await;
    }
}

/// A worker died on its own (no item revoked). Drop its active entry; per
/// the design notes this never triggers a restart or a re-match — a
/// worker crash with its inputs still present is a bug in the worker, not
/// a scheduling event.
async fn handle_worker_down<C: Clock>(state: &mut State<C>, handle: WorkerHandle, reason: String) {
    let Some((factory_id, tuple)) = state.active.entry_by_worker(handle) else {
        // Cascade already removed this entry (item death races worker
        // death); nothing left to do.
        return;
    };
    (state.sink)(Event::ChildStopped {
        factory_id: factory_id.to_string(),
        tuple: tuple.clone(),
        worker: Some(handle),
        reason,
        epoch_ms: state.clock.epoch_ms(),
    });
    state.active.remove(&factory_id, &tuple);
}

async fn stop_entry<C: Clock>(state: &mut State<C>, factory_id: &FactoryId, tuple: &[ItemRef], reason: String) {
    let Some(entry) = state.active.get(factory_id, tuple).cloned() else { return };
    (state.sink)(Event::ChildStopping {
        factory_id: factory_id.to_string(),
        tuple: tuple.to_vec(),
        worker: entry.worker,
        reason: reason.clone(),
        epoch_ms: state.clock.epoch_ms(),
    });
    state.host.kill(entry.worker, reason.clone()).await;
    state.active.remove(factory_id, tuple);
    (state.sink)(Event::ChildStopped {
        factory_id: factory_id.to_string(),
        tuple: tuple.to_vec(),
        worker: Some(entry.worker),
        reason,
        epoch_ms: state.clock.epoch_ms(),
    });
}

#[cfg(test)]
#[path = "injector_tests.rs"]
mod tests;
