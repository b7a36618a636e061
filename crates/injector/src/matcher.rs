// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The matcher (C6): turns a factory's `requires` list and the current
//! item table into the ordered set of argument tuples that should be
//! active.
//!
//! Pure and synchronous — it only reads the item table and hands back
//! candidates; reconciling those against the active set and spawning is
//! the injector's job.

use crate::factory::Factory;
use crate::item_table::ItemTable;
use tend_core::Item;

/// Enumerate every satisfying argument tuple for `factory`, in
/// lexicographic order of the position-wise indices into each required
/// key's value sequence — the Cartesian product `V1 x V2 x ... x Vn`.
///
/// An empty `requires` list yields exactly one (empty) tuple: the empty
/// Cartesian product is the singleton set containing the empty tuple, so
/// a zero-dependency factory matches once, unconditionally.
pub(crate) fn candidate_tuples(factory: &Factory, table: &ItemTable) -> Vec<Vec<Item>> {
    let mut tuples: Vec<Vec<Item>> = vec![Vec::new()];
    for key in &factory.requires {
        let values = table.values(key);
        if values.is_empty() {
            return Vec::new();
        }
        let mut next = Vec::with_capacity(tuples.len() * values.len());
        for prefix in &tuples {
            for value in values {
                let mut candidate = prefix.clone();
                candidate.push(value.clone());
                next.push(candidate);
            }
        }
        tuples = next;
    }
    tuples
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
