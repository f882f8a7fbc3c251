//! Tests for `TrackingHub`.
//!
//! These exercise the live-tracking registry directly, without performing
//! any HTTP upgrades or touching the database.

use axum::extract::ws::Message;
use tokio::sync::mpsc::error::TryRecvError;
use workout_api::ws::TrackingHub;

fn text(s: &str) -> Message {
    Message::Text(s.into())
}

// ---------------------------------------------------------------------------
// Test: register / deregister bookkeeping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_hub_has_zero_connections() {
    let hub = TrackingHub::new();
    assert_eq!(hub.connection_count().await, 0);
}

#[tokio::test]
async fn register_counts_per_room() {
    let hub = TrackingHub::new();

    let _a = hub.register("conn-a".to_string(), 1, 10).await;
    let _b = hub.register("conn-b".to_string(), 1, 10).await;
    let _c = hub.register("conn-c".to_string(), 2, 20).await;

    assert_eq!(hub.connection_count().await, 3);
    assert_eq!(hub.room_connection_count(1).await, 2);
    assert_eq!(hub.room_connection_count(2).await, 1);
    assert_eq!(hub.room_connection_count(3).await, 0);
}

// ---------------------------------------------------------------------------
// Test: deregister queues Close and is idempotent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deregister_sends_close_then_is_noop() {
    let hub = TrackingHub::new();
    let mut rx = hub.register("conn-1".to_string(), 1, 10).await;

    assert!(hub.deregister("conn-1").await);
    assert_eq!(hub.connection_count().await, 0);

    let msg = rx.recv().await.expect("should receive Close");
    assert!(matches!(msg, Message::Close(None)), "got: {msg:?}");
    // Sender dropped with the registry entry.
    assert!(rx.recv().await.is_none());

    assert!(!hub.deregister("conn-1").await);
}

#[tokio::test]
async fn deregister_unknown_id_is_noop() {
    let hub = TrackingHub::new();
    let _rx = hub.register("conn-1".to_string(), 1, 10).await;

    assert!(!hub.deregister("nonexistent").await);
    assert_eq!(hub.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: broadcast is room-scoped
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_reaches_only_the_room() {
    let hub = TrackingHub::new();
    let mut rx1 = hub.register("conn-1".to_string(), 7, 10).await;
    let mut rx2 = hub.register("conn-2".to_string(), 7, 11).await;
    let mut other = hub.register("conn-3".to_string(), 8, 12).await;

    let delivered = hub.broadcast(7, text("room seven")).await;
    assert_eq!(delivered, 2);

    for rx in [&mut rx1, &mut rx2] {
        let msg = rx.recv().await.expect("room listener should receive");
        assert!(matches!(&msg, Message::Text(t) if t.as_str() == "room seven"));
    }
    assert_eq!(other.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn broadcast_skips_closed_channels() {
    let hub = TrackingHub::new();
    let rx1 = hub.register("conn-1".to_string(), 1, 10).await;
    let mut rx2 = hub.register("conn-2".to_string(), 1, 10).await;

    drop(rx1);

    let delivered = hub.broadcast(1, text("still alive")).await;
    assert_eq!(delivered, 1);

    let msg = rx2.recv().await.expect("rx2 should still receive");
    assert!(matches!(&msg, Message::Text(t) if t.as_str() == "still alive"));
}

#[tokio::test]
async fn late_registrant_gets_nothing_retroactively() {
    let hub = TrackingHub::new();
    let _early = hub.register("early".to_string(), 1, 10).await;

    hub.broadcast(1, text("before")).await;

    let mut late = hub.register("late".to_string(), 1, 10).await;
    assert_eq!(late.try_recv().unwrap_err(), TryRecvError::Empty);

    hub.broadcast(1, text("after")).await;
    let msg = late.recv().await.unwrap();
    assert!(matches!(&msg, Message::Text(t) if t.as_str() == "after"));
}

#[tokio::test]
async fn broadcast_to_empty_room_delivers_nothing() {
    let hub = TrackingHub::new();
    assert_eq!(hub.broadcast(42, text("anyone?")).await, 0);
}

// ---------------------------------------------------------------------------
// Test: ping_all and shutdown_all
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ping_all_reaches_every_room() {
    let hub = TrackingHub::new();
    let mut rx1 = hub.register("conn-1".to_string(), 1, 10).await;
    let mut rx2 = hub.register("conn-2".to_string(), 2, 20).await;

    hub.ping_all().await;

    assert!(matches!(rx1.recv().await, Some(Message::Ping(_))));
    assert!(matches!(rx2.recv().await, Some(Message::Ping(_))));
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let hub = TrackingHub::new();
    let mut rx1 = hub.register("conn-1".to_string(), 1, 10).await;
    let mut rx2 = hub.register("conn-2".to_string(), 2, 20).await;

    hub.shutdown_all().await;

    assert_eq!(hub.connection_count().await, 0);
    assert!(matches!(rx1.recv().await, Some(Message::Close(None))));
    assert!(matches!(rx2.recv().await, Some(Message::Close(None))));
    assert!(rx1.recv().await.is_none(), "channel should be closed");
}

// ---------------------------------------------------------------------------
// Test: concurrent register/broadcast/deregister
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_churn_leaves_registry_consistent() {
    let hub = std::sync::Arc::new(TrackingHub::new());

    let mut tasks = Vec::new();
    for i in 0..32 {
        let hub = hub.clone();
        tasks.push(tokio::spawn(async move {
            let conn_id = format!("conn-{i}");
            let room = i % 4;
            let _rx = hub.register(conn_id.clone(), room, i).await;
            hub.broadcast(room, Message::Text(format!("from {i}").into())).await;
            assert!(hub.deregister(&conn_id).await);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(hub.connection_count().await, 0);
}
