// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::factory::Factory;
use std::future::ready;

fn factory(id: &str, requires: Vec<&str>) -> Factory {
    let requires = requires.into_iter().map(Key::new).collect();
    Factory::new(id, requires, move |_host, _deps| Box::pin(ready(Err("unused".to_string()))))
}

fn value(item: &Item) -> i32 {
    *item.value::<i32>().unwrap()
}

#[test]
fn empty_requires_yields_one_empty_tuple() {
    let table = ItemTable::default();
    let f = factory("singleton", vec![]);
    let tuples = candidate_tuples(&f, &table);
    assert_eq!(tuples.len(), 1);
    assert!(tuples[0].is_empty());
}

#[test]
fn missing_required_key_yields_no_tuples() {
    let table = ItemTable::default();
    let f = factory("a", vec!["x"]);
    assert!(candidate_tuples(&f, &table).is_empty());
}

#[test]
fn single_key_enumerates_in_insertion_order() {
    let mut table = ItemTable::default();
    table.insert(Item::new("x", 1));
    table.insert(Item::new("x", 2));
    let f = factory("a", vec!["x"]);
    let tuples = candidate_tuples(&f, &table);
    let values: Vec<i32> = tuples.iter().map(|t| value(&t[0])).collect();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn two_keys_enumerate_cartesian_product_lexicographically() {
    let mut table = ItemTable::default();
    table.insert(Item::new("x", 1));
    table.insert(Item::new("x", 2));
    table.insert(Item::new("y", 9));
    let f = factory("b", vec!["x", "y"]);
    let tuples = candidate_tuples(&f, &table);
    let pairs: Vec<(i32, i32)> = tuples.iter().map(|t| (value(&t[0]), value(&t[1]))).collect();
    assert_eq!(pairs, vec![(1, 9), (2, 9)]);
}

#[test]
fn a_second_push_under_y_extends_the_product_in_order() {
    let mut table = ItemTable::default();
    table.insert(Item::new("x", 1));
    table.insert(Item::new("x", 2));
    table.insert(Item::new("y", 9));
    table.insert(Item::new("y", 10));
    let f = factory("b", vec!["x", "y"]);
    let tuples = candidate_tuples(&f, &table);
    let pairs: Vec<(i32, i32)> = tuples.iter().map(|t| (value(&t[0]), value(&t[1]))).collect();
    assert_eq!(pairs, vec![(1, 9), (1, 10), (2, 9), (2, 10)]);
}

#[test]
fn duplicate_required_keys_are_legal_and_yield_self_products() {
    let mut table = ItemTable::default();
    table.insert(Item::new("x", 1));
    table.insert(Item::new("x", 2));
    let f = factory("dup", vec!["x", "x"]);
    let tuples = candidate_tuples(&f, &table);
    let pairs: Vec<(i32, i32)> = tuples.iter().map(|t| (value(&t[0]), value(&t[1]))).collect();
    assert_eq!(pairs, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
}
