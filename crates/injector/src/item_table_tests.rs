// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn values_for_absent_key_is_empty() {
    let table = ItemTable::default();
    assert!(table.values(&Key::new("x")).is_empty());
}

#[test]
fn insert_then_values_preserves_insertion_order() {
    let mut table = ItemTable::default();
    let a = Item::new("x", 1);
    let b = Item::new("x", 2);
    table.insert(a.clone());
    table.insert(b.clone());

    let values = table.values(&Key::new("x"));
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].item_ref(), a.item_ref());
    assert_eq!(values[1].item_ref(), b.item_ref());
}

#[test]
fn remove_deletes_the_key_entry_once_empty() {
    let mut table = ItemTable::default();
    let a = Item::new("x", 1);
    table.insert(a.clone());
    let removed = table.remove(a.item_ref()).unwrap();
    assert_eq!(removed.item_ref(), a.item_ref());
    assert!(table.values(&Key::new("x")).is_empty());
    assert!(table.get(a.item_ref()).is_none());
}

#[test]
fn remove_unknown_ref_is_none() {
    let mut table = ItemTable::default();
    assert!(table.remove(ItemRef::new()).is_none());
}

#[test]
fn two_items_with_equal_value_remain_distinct() {
    let mut table = ItemTable::default();
    let a = Item::new("x", 7);
    let b = Item::new("x", 7);
    table.insert(a.clone());
    table.insert(b.clone());
    assert_eq!(table.values(&Key::new("x")).len(), 2);
    assert_ne!(a.item_ref(), b.item_ref());
}
