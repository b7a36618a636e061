// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The active set (C5): which factory instantiations are currently
//! running, keyed by `(factory id, argument tuple)`.
//!
//! Like the factory registry, this is owned exclusively by the injector's
//! event loop, so it is a plain (unlocked) structure.

use crate::factory::FactoryId;
use std::collections::HashMap;
use tend_core::{ItemRef, MonitorToken, WorkerHandle};

/// A candidate or active argument tuple, identified by the pointwise refs
/// of the items that fill it — per the data model, tuples compare equal
/// by ref, never by value.
pub(crate) type TupleKey = Vec<ItemRef>;

#[derive(Clone)]
pub(crate) struct ActiveEntry {
    pub(crate) worker: WorkerHandle,
    pub(crate) monitor: MonitorToken,
}

#[derive(Default)]
pub(crate) struct ActiveSet {
    entries: HashMap<(FactoryId, TupleKey), ActiveEntry>,
    /// Reverse index: item ref -> every active key whose tuple contains it,
    /// in the order each key was put — a plain `Vec` rather than a
    /// `HashSet`, so cascade teardown visits dependents in the same order
    /// every run instead of whatever order a `HashSet` iterates in (P3).
    involving: HashMap<ItemRef, Vec<(FactoryId, TupleKey)>>,
    /// Reverse index: worker handle -> its one active key (I4: a worker
    /// handle never backs more than one active entry).
    by_worker: HashMap<WorkerHandle, (FactoryId, TupleKey)>,
}

impl ActiveSet {
    pub(crate) fn contains(&self, factory: &FactoryId, tuple: &[ItemRef]) -> bool {
        self.entries.contains_key(&(factory.clone(), tuple.to_vec()))
    }

    pub(crate) fn put(&mut self, factory: FactoryId, tuple: TupleKey, entry: ActiveEntry) {
        let key = (factory, tuple);
        for item_ref in &key.1 {
            self.involving.entry(*item_ref).or_default().push(key.clone());
        }
        self.by_worker.insert(entry.worker, key.clone());
        self.entries.insert(key, entry);
    }

    pub(crate) fn remove(&mut self, factory: &FactoryId, tuple: &[ItemRef]) -> Option<ActiveEntry> {
        let key = (factory.clone(), tuple.to_vec());
        let entry = self.entries.remove(&key)?;
        for item_ref in &key.1 {
            if let Some(keys) = self.involving.get_mut(item_ref) {
                keys.retain(|k| k != &key);
                if keys.is_empty() {
                    self.involving.remove(item_ref);
                }
            }
        }
        self.by_worker.remove(&entry.worker);
        Some(entry)
    }

    /// All active entries whose tuple contains the given item, by ref, in
    /// the deterministic order they were put.
    pub(crate) fn entries_involving(&self, item_ref: ItemRef) -> Vec<(FactoryId, TupleKey)> {
        self.involving.get(&item_ref).cloned().unwrap_or_default()
    }

    pub(crate) fn entry_by_worker(&self, handle: WorkerHandle) -> Option<(FactoryId, TupleKey)> {
        self.by_worker.get(&handle).cloned()
    }

    pub(crate) fn get(&self, factory: &FactoryId, tuple: &[ItemRef]) -> Option<&ActiveEntry> {
        self.entries.get(&(factory.clone(), tuple.to_vec()))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "active_set_tests.rs"]
mod tests;
