// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where the structured event stream goes.
//!
//! A plain `Fn(Event)` rather than a trait with a `Clone` bound — callers
//! that want a `Clock`-style testable abstraction can still hand in a
//! closure that forwards into an `mpsc::UnboundedSender`, which is what
//! the test suite does to assert on event order.

use std::sync::Arc;
use tend_core::Event;

pub type EventSink = Arc<dyn Fn(Event) + Send + Sync>;

pub fn tracing_sink() -> EventSink {
    Arc::new(|event: Event| tracing::info!(?event, "engine event"))
}
