// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The structured event stream emitted by the injector.
//!
//! Every state change funnels through one of these variants. Tests assert
//! against this stream rather than against internal state, per the
//! determinism property the injector is required to uphold.

use crate::ids::WorkerHandle;
use crate::item::ItemRef;
use crate::key::Key;
use serde::{Deserialize, Serialize};

/// A structured record of one state change, as emitted onto the event
/// stream.
///
/// Serializes as `{"type": "event:name", ...fields}`. Unknown type tags
/// deserialize to [`Event::Custom`] so downstream consumers (and replay
/// tooling) tolerate events emitted by a newer engine version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "factory_added")]
    FactoryAdded { factory_id: String, epoch_ms: u64 },

    #[serde(rename = "factory_removed")]
    FactoryRemoved { factory_id: String, epoch_ms: u64 },

    #[serde(rename = "item_pushed")]
    ItemPushed { key: Key, item_ref: ItemRef, epoch_ms: u64 },

    #[serde(rename = "item_revoked")]
    ItemRevoked { key: Key, item_ref: ItemRef, reason: String, epoch_ms: u64 },

    #[serde(rename = "child_starting")]
    ChildStarting { factory_id: String, tuple: Vec<ItemRef>, epoch_ms: u64 },

    #[serde(rename = "child_started")]
    ChildStarted { factory_id: String, tuple: Vec<ItemRef>, worker: WorkerHandle, epoch_ms: u64 },

    #[serde(rename = "child_stopping")]
    ChildStopping {
        factory_id: String,
        tuple: Vec<ItemRef>,
        worker: WorkerHandle,
        reason: String,
        epoch_ms: u64,
    },

    #[serde(rename = "child_stopped")]
    ChildStopped {
        factory_id: String,
        tuple: Vec<ItemRef>,
        worker: Option<WorkerHandle>,
        reason: String,
        epoch_ms: u64,
    },

    #[serde(rename = "rpc_failed")]
    RpcFailed { worker: WorkerHandle, reason: String, epoch_ms: u64 },

    #[serde(other)]
    Custom,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
