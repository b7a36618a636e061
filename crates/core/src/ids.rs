// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generated identifiers shared by the host and injector crates.
//!
//! These are plain opaque handles — nothing about their *shape* matters,
//! only that two handles compare equal iff they name the same entity.
//! Keeping them in `tend-core` lets [`crate::item::Item`] reference a
//! worker as its owner without the core crate depending on the worker
//! host implementation.

crate::define_id! {
    /// Handle to a spawned worker task. Stable for the worker's lifetime;
    /// never reused after the worker terminates.
    pub struct WorkerHandle("wkr-");
}

crate::define_id! {
    /// One-shot token returned by a `monitor()` call. Correlates a later
    /// `item_down`/`worker_down` liveness notification back to the call
    /// that installed the watch.
    pub struct MonitorToken("mon-");
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
