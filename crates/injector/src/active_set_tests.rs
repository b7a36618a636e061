// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn entry() -> ActiveEntry {
    ActiveEntry { worker: WorkerHandle::new(), monitor: MonitorToken::new() }
}

#[test]
fn put_then_contains_and_remove() {
    let mut set = ActiveSet::default();
    let factory = FactoryId::new("a");
    let tuple = vec![ItemRef::new()];
    assert!(!set.contains(&factory, &tuple));

    set.put(factory.clone(), tuple.clone(), entry());
    assert!(set.contains(&factory, &tuple));

    let removed = set.remove(&factory, &tuple);
    assert!(removed.is_some());
    assert!(!set.contains(&factory, &tuple));
}

#[test]
fn entries_involving_finds_every_tuple_containing_an_item() {
    let mut set = ActiveSet::default();
    let shared = ItemRef::new();
    let other = ItemRef::new();

    set.put(FactoryId::new("a"), vec![shared, other], entry());
    set.put(FactoryId::new("b"), vec![shared], entry());
    set.put(FactoryId::new("c"), vec![other], entry());

    let hits = set.entries_involving(shared);
    let ids: Vec<&str> = hits.iter().map(|(f, _)| f.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"], "entries_involving must return put order, not hash order");
}

#[test]
fn entry_by_worker_is_symmetric_with_put() {
    let mut set = ActiveSet::default();
    let e = entry();
    let handle = e.worker;
    set.put(FactoryId::new("a"), vec![ItemRef::new()], e);
    let (factory, _tuple) = set.entry_by_worker(handle).unwrap();
    assert_eq!(factory.as_str(), "a");
}

#[test]
fn remove_clears_both_reverse_indices() {
    let mut set = ActiveSet::default();
    let item_ref = ItemRef::new();
    let e = entry();
    let handle = e.worker;
    set.put(FactoryId::new("a"), vec![item_ref], e);
    set.remove(&FactoryId::new("a"), &[item_ref]);

    assert!(set.entries_involving(item_ref).is_empty());
    assert!(set.entry_by_worker(handle).is_none());
    assert_eq!(set.len(), 0);
}
