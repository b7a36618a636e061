// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;

struct Echo;

#[async_trait]
impl Worker for Echo {
    async fn handle(&mut self, envelope: Envelope) -> Transition {
        match envelope.downcast::<i32>() {
            Ok((n, reply)) => {
                reply.reply(*n * 2);
                Transition::Continue
            }
            Err(_) => Transition::Continue,
        }
    }
}

#[test]
fn default_current_fn_is_handle() {
    assert_eq!(Echo.current_fn(), "handle");
}
