// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::item::Item;
use crate::key::Key;

/// Proptest strategies for core types.
pub mod strategies {
    use crate::key::Key;
    use proptest::prelude::*;

    pub fn arb_key() -> impl Strategy<Value = Key> {
        "[a-z][a-z0-9_-]{0,12}".prop_map(Key::new)
    }
}

/// Build a plain `i32`-valued item under the given key — the default
/// payload shape used throughout the matcher and injector test suites.
pub fn test_item(key: impl Into<Key>, value: i32) -> Item {
    Item::new(key, value)
}
