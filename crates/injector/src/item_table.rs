// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The item table (C4): a multi-map from item key to the ordered sequence
//! of currently live items under it.
//!
//! Order is insertion order and is load-bearing: the matcher's Cartesian
//! product enumeration must be deterministic given the same push history,
//! so `values` hands back the backing sequence, not a re-sorted view.

use std::collections::HashMap;
use tend_core::{Item, ItemRef, Key};

#[derive(Default)]
pub(crate) struct ItemTable {
    by_key: HashMap<Key, Vec<Item>>,
    key_of: HashMap<ItemRef, Key>,
}

impl ItemTable {
    /// Appends the item under its key. A ref already present is a no-op —
    /// refs are unique by construction, so this only guards against a
    /// caller pushing the same `Item` value twice.
    pub(crate) fn insert(&mut self, item: Item) {
        if self.key_of.contains_key(&item.item_ref()) {
            return;
        }
        self.key_of.insert(item.item_ref(), item.key().clone());
        self.by_key.entry(item.key().clone()).or_default().push(item);
    }

    /// Removes by ref equality, deleting the key's entry entirely once its
    /// sequence empties (I1). Returns the removed item, if any.
    pub(crate) fn remove(&mut self, item_ref: ItemRef) -> Option<Item> {
        let key = self.key_of.remove(&item_ref)?;
        let bucket = self.by_key.get_mut(&key)?;
        let pos = bucket.iter().position(|existing| existing.item_ref() == item_ref)?;
        let removed = bucket.remove(pos);
        if bucket.is_empty() {
            self.by_key.remove(&key);
        }
        Some(removed)
    }

    pub(crate) fn values(&self, key: &Key) -> &[Item] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn get(&self, item_ref: ItemRef) -> Option<&Item> {
        let key = self.key_of.get(&item_ref)?;
        self.by_key.get(key)?.iter().find(|item| item.item_ref() == item_ref)
    }
}

#[cfg(test)]
#[path = "item_table_tests.rs"]
mod tests;
