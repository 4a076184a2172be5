//! Callback-style surface for poolgate
//!
//! The callback adapters are thin shims over the one async primitive, so
//! every gate invariant has to hold across styles: a callback-style caller
//! and a promise-style caller share the same handle and the same single
//! driver dial.
//!
//! Run with: cargo test --test callback_api

use poolgate::driver::MemoryDriver;
use poolgate::{ConnectRequest, GatePhase, PoolGate};
use tokio::sync::oneshot;

#[tokio::test]
async fn test_callback_and_async_styles_share_one_handle() {
    let gate = PoolGate::new(MemoryDriver::new());

    let (tx, rx) = oneshot::channel();
    gate.get_connection_with(
        ConnectRequest::to("memory://primary").pool_size(3),
        move |result| {
            let _ = tx.send(result);
        },
    );
    let via_callback = rx
        .await
        .expect("callback never ran")
        .expect("callback connect failed");

    let via_async = gate
        .get_connection(ConnectRequest::reuse())
        .await
        .expect("async reuse failed");

    assert_eq!(via_callback, via_async);
    assert_eq!(gate.driver().stats().connects, 1);
}

#[tokio::test]
async fn test_callback_surfaces_the_driver_failure() {
    let gate = PoolGate::new(MemoryDriver::new());
    gate.driver().fail_next("primary down");

    let (tx, rx) = oneshot::channel();
    gate.get_connection_with(ConnectRequest::to("memory://primary"), move |result| {
        let _ = tx.send(result);
    });

    let result = rx.await.expect("callback never ran");
    let error = result.expect_err("scripted failure should surface");
    assert_eq!(error.driver_error().expect("not a driver error").0, "primary down");
    assert_eq!(gate.phase(), GatePhase::Empty);
}

#[tokio::test]
async fn test_peek_overload_is_synchronous_and_side_effect_free() {
    let gate = PoolGate::new(MemoryDriver::new());

    // Before any connect: empty marker, no driver activity.
    assert!(gate.peek_connection(|handle| handle.is_none()));
    assert_eq!(gate.driver().stats().connects, 0);
    assert_eq!(gate.phase(), GatePhase::Empty);

    let stored = gate
        .get_connection(ConnectRequest::to("memory://primary"))
        .await
        .expect("connect failed");

    let peeked = gate.peek_connection(|handle| handle).expect("peek empty");
    assert_eq!(peeked, stored);
    assert_eq!(gate.driver().stats().connects, 1);
}

#[tokio::test]
async fn test_callback_close_pool() {
    let gate = PoolGate::new(MemoryDriver::new());
    gate.get_connection(ConnectRequest::to("memory://primary"))
        .await
        .expect("connect failed");

    let (tx, rx) = oneshot::channel();
    gate.close_pool_with(true, move |result| {
        let _ = tx.send(result);
    });

    rx.await
        .expect("callback never ran")
        .expect("close failed");

    assert!(gate.db().is_none());
    let stats = gate.driver().stats();
    assert_eq!(stats.open, 0);
    assert_eq!(stats.forced_closes, 1);
}
