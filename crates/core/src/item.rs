// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Items: keyed, ref-identified, type-erased values pushed into the registry.

use crate::ids::WorkerHandle;
use crate::key::Key;
use std::any::Any;
use std::sync::Arc;

crate::define_id! {
    /// Stable handle for one [`Item`] instance.
    ///
    /// Two items with an equal `(key, value)` pair are still distinct if
    /// their refs differ — the ref, not the payload, is the identity the
    /// matcher and active set key off of.
    pub struct ItemRef("item-");
}

/// A keyed, ref-identified unit of state pushed into the item table.
///
/// The value is type-erased (`Arc<dyn Any>`) because a single running
/// engine hosts factories from unrelated domains that each define their
/// own payload types; the engine itself never inspects a value, only
/// compares refs and routes by key.
#[derive(Clone)]
pub struct Item {
    key: Key,
    item_ref: ItemRef,
    value: Arc<dyn Any + Send + Sync>,
    owner: Option<WorkerHandle>,
}

impl Item {
    /// Construct a fresh item with a unique ref under the given key.
    pub fn new(key: impl Into<Key>, value: impl Any + Send + Sync) -> Self {
        Self { key: key.into(), item_ref: ItemRef::new(), value: Arc::new(value), owner: None }
    }

    /// Construct an item owned by the given worker — if that worker dies,
    /// the caller is expected to withdraw the item (see `tend-injector`'s
    /// cascading teardown).
    pub fn with_owner(key: impl Into<Key>, value: impl Any + Send + Sync, owner: WorkerHandle) -> Self {
        Self {
            key: key.into(),
            item_ref: ItemRef::new(),
            value: Arc::new(value),
            owner: Some(owner),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn item_ref(&self) -> ItemRef {
        self.item_ref
    }

    pub fn owner(&self) -> Option<WorkerHandle> {
        self.owner
    }

    /// Downcast the type-erased payload. Returns `None` if the caller asks
    /// for the wrong concrete type — a programming error on the caller's
    /// part, not a recoverable condition, so callers that know their own
    /// factories' value types can `unwrap()` this at the boundary.
    pub fn value<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn value_any(&self) -> &(dyn Any + Send + Sync) {
        self.value.as_ref()
    }
}

impl std::fmt::Debug for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Item").field("key", &self.key).field("item_ref", &self.item_ref).finish()
    }
}

impl PartialEq for Item {
    /// Items compare equal by ref, not by key/value — the data model
    /// invariant is that equal (key, value) pairs pushed twice are still
    /// two distinct items (I1/I2 in the design docs).
    fn eq(&self, other: &Self) -> bool {
        self.item_ref == other.item_ref
    }
}

impl Eq for Item {}

impl std::hash::Hash for Item {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.item_ref.hash(state);
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
