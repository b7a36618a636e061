// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Factories: recipes for starting a worker once its required items exist.

use smol_str::SmolStr;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tend_core::{Item, Key};
use tend_host::Host;

/// Identifies one registered [`Factory`]. An atom-like symbol, same shape
/// as [`tend_core::Key`] but kept distinct — a factory id and an item key
/// live in different namespaces even when an author reuses the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactoryId(SmolStr);

impl FactoryId {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(SmolStr::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FactoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FactoryId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FactoryId {
    fn from(s: String) -> Self {
        Self(SmolStr::new(s))
    }
}

impl std::borrow::Borrow<str> for FactoryId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

pub type StartFuture = Pin<Box<dyn Future<Output = Result<tend_core::WorkerHandle, String>> + Send>>;

/// A factory's start recipe: given the host to spawn on and the resolved
/// dependency list (in declared `requires` order, duplicated keys yielding
/// duplicated entries), produce a running worker or a reason it couldn't.
///
/// The recipe is expected to call `host.spawn` itself — it, not the
/// matcher, knows which concrete `Worker` impl and `create_initial_state`
/// closure the factory stands for.
pub trait StartRecipe: Fn(Host, Vec<(Key, Item)>) -> StartFuture + Send + Sync {}
impl<F> StartRecipe for F where F: Fn(Host, Vec<(Key, Item)>) -> StartFuture + Send + Sync {}

/// A registered recipe for starting workers: the item keys it needs, the
/// keys it promises to push back, and the procedure that spawns one
/// instance given a satisfying argument tuple.
#[derive(Clone)]
pub struct Factory {
    pub id: FactoryId,
    pub requires: Vec<Key>,
    pub provides: Vec<Key>,
    start: Arc<dyn StartRecipe>,
}

impl Factory {
    pub fn new(
        id: impl Into<FactoryId>,
        requires: Vec<Key>,
        start: impl Fn(Host, Vec<(Key, Item)>) -> StartFuture + Send + Sync + 'static,
    ) -> Self {
        Self { id: id.into(), requires, provides: Vec::new(), start: Arc::new(start) }
    }

    pub fn with_provides(mut self, provides: Vec<Key>) -> Self {
        self.provides = provides;
        self
    }

    pub(crate) async fn start(&self, host: Host, dependencies: Vec<(Key, Item)>) -> Result<tend_core::WorkerHandle, String> {
        (self.start)(host, dependencies).await
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("id", &self.id)
            .field("requires", &self.requires)
            .field("provides", &self.provides)
            .finish()
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
