// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn downcast_succeeds_for_matching_type() {
    let (tx, rx) = oneshot::channel();
    let envelope = Envelope { payload: Box::new(7_i32), reply: ReplyHandle::new(tx) };
    let (value, reply) = envelope.downcast::<i32>().map_err(|_| "wrong type").unwrap();
    assert_eq!(*value, 7);
    reply.reply(14_i32);
    let got = rx.await.unwrap();
    assert_eq!(*got.downcast::<i32>().unwrap(), 14);
}

#[tokio::test]
async fn downcast_fails_for_mismatched_type_and_returns_envelope() {
    let (tx, _rx) = oneshot::channel();
    let envelope = Envelope { payload: Box::new(7_i32), reply: ReplyHandle::new(tx) };
    let envelope = envelope.downcast::<String>().unwrap_err();
    assert!(envelope.downcast::<i32>().is_ok());
}

#[tokio::test]
async fn discarded_reply_is_a_silent_no_op() {
    let reply = ReplyHandle::discarded();
    // Must not panic even though nothing is listening.
    reply.reply(1_i32);
}

#[tokio::test]
async fn reply_to_dropped_receiver_does_not_panic() {
    let (tx, rx) = oneshot::channel();
    drop(rx);
    let reply = ReplyHandle::new(tx);
    reply.reply(1_i32);
}
