// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tend-engine: the public surface — one [`Engine`] handle combining the
//! worker host and the injector running on top of it.

mod engine;

pub use engine::Engine;
pub use tend_core::{EngineError, Event, Item, ItemRef, Key, RpcFailure, WorkerHandle};
pub use tend_host::{SpawnOptions, Transition, Worker, WorkerIdentity};
pub use tend_injector::{EventSink, Factory, FactoryId};
