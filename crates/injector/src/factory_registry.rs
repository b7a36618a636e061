// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The factory registry (C3): id to [`Factory`] bookkeeping.
//!
//! Owned exclusively by the injector's event loop — see [`crate::injector`]
//! — so, unlike `tend-host`'s registry, this one needs no lock: nothing
//! outside the loop ever touches it concurrently.

use crate::factory::{Factory, FactoryId};
use std::collections::HashMap;
use tend_core::{EngineError, Key};

/// Insertion-ordered by hand: a plain `HashMap` would let iteration order
/// (and thus spawn order across factories) depend on hash bucket layout,
/// which would break the determinism property matching is required to
/// uphold.
#[derive(Default)]
pub(crate) struct FactoryRegistry {
    order: Vec<FactoryId>,
    factories: HashMap<FactoryId, Factory>,
}

impl FactoryRegistry {
    pub(crate) fn add(&mut self, factory: Factory) -> Result<(), EngineError> {
        if self.factories.contains_key(&factory.id) {
            return Err(EngineError::AlreadyAdded(factory.id.to_string()));
        }
        self.order.push(factory.id.clone());
        self.factories.insert(factory.id.clone(), factory);
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: &FactoryId) -> Result<Factory, EngineError> {
        let factory = self.factories.remove(id).ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        self.order.retain(|existing| existing != id);
        Ok(factory)
    }

    pub(crate) fn lookup(&self, id: &FactoryId) -> Option<&Factory> {
        self.factories.get(id)
    }

    pub(crate) fn all(&self) -> impl Iterator<Item = &Factory> {
        self.order.iter().filter_map(|id| self.factories.get(id))
    }

    /// Factories whose `requires` names the given key, in registration
    /// order — the set re-matched whenever a new item under that key
    /// arrives.
    pub(crate) fn depending_on(&self, key: &Key) -> Vec<&Factory> {
        self.all().filter(|f| f.requires.contains(key)).collect()
    }
}

#[cfg(test)]
#[path = "factory_registry_tests.rs"]
mod tests;
