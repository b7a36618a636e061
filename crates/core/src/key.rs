// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Item keys.
//!
//! A [`Key`] is an atom-like symbol: cheap to clone, cheap to compare, and
//! opaque to everything except the code that chose it. Factories declare
//! their `requires`/`provides` lists in terms of keys; the item table is a
//! multi-map keyed on them.

use smol_str::SmolStr;
use std::fmt;

/// An opaque, interned-cheap identifier for an item's slot in the table.
///
/// Two keys are equal iff their underlying text is equal. `SmolStr` keeps
/// short keys (the common case — `"config"`, `"serial-port"`, ...) inline,
/// so cloning a `Key` to build an argument tuple never touches the heap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Key(SmolStr);

impl Key {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(SmolStr::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(SmolStr::new(s))
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.0.as_str() == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_str() == *other
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
