// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn factory_added_serializes_with_type_tag() {
    let event = Event::FactoryAdded { factory_id: "hw-scan".into(), epoch_ms: 1_000 };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "factory_added");
    assert_eq!(json["factory_id"], "hw-scan");
}

#[test]
fn unknown_type_tag_deserializes_to_custom() {
    let json = r#"{"type": "something_from_the_future"}"#;
    let event: Event = serde_json::from_str(json).unwrap();
    assert_eq!(event, Event::Custom);
}

#[test]
fn item_pushed_roundtrips() {
    let event = Event::ItemPushed { key: Key::new("x"), item_ref: ItemRef::new(), epoch_ms: 42 };
    let json = serde_json::to_string(&event).unwrap();
    let parsed: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, event);
}
