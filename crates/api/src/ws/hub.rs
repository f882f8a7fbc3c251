use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use workout_core::types::{DbId, Timestamp};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type HubSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single live-tracking connection.
pub struct HubConnection {
    /// Tracking room (`tracking_data.id`) the connection listens on.
    pub room_id: DbId,
    /// Authenticated owner of the connection.
    pub user_id: DbId,
    /// Channel sender for outbound messages to this connection.
    pub sender: HubSender,
    /// When this connection was registered.
    pub connected_at: Timestamp,
}

/// Process-wide registry of live-tracking connections.
///
/// Thread-safe via interior `RwLock`; wrapped in `Arc` and shared through
/// [`crate::state::AppState`]. Fan-out is scoped to a tracking room so a
/// route is only ever streamed to connections opened on that room.
pub struct TrackingHub {
    connections: RwLock<HashMap<String, HubConnection>>,
}

impl TrackingHub {
    /// Create a new, empty hub.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection on `room_id`.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink. Messages broadcast before this
    /// call are never delivered to it.
    pub async fn register(
        &self,
        conn_id: String,
        room_id: DbId,
        user_id: DbId,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = HubConnection {
            room_id,
            user_id,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Queue a Close frame for the connection and remove it.
    ///
    /// Returns `false` (and does nothing) if the connection is not
    /// registered, so calling it twice is harmless.
    pub async fn deregister(&self, conn_id: &str) -> bool {
        let removed = self.connections.write().await.remove(conn_id);
        match removed {
            Some(conn) => {
                let _ = conn.sender.send(Message::Close(None));
                let connected_secs = (chrono::Utc::now() - conn.connected_at).num_seconds();
                tracing::info!(
                    conn_id,
                    user_id = conn.user_id,
                    room_id = conn.room_id,
                    connected_secs,
                    "Live tracking connection deregistered"
                );
                true
            }
            None => false,
        }
    }

    /// Send `message` to every connection registered on `room_id`.
    ///
    /// Best-effort: a connection whose channel is closed is skipped without
    /// affecting the others. Returns the number of connections the message
    /// was queued for.
    pub async fn broadcast(&self, room_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut delivered = 0;
        for conn in conns.values().filter(|c| c.room_id == room_id) {
            if conn.sender.send(message.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Return the current number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Number of connections listening on `room_id`.
    pub async fn room_connection_count(&self, room_id: DbId) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|c| c.room_id == room_id)
            .count()
    }

    /// Send a Close frame to every connection, then clear the registry.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all live-tracking connections");
    }

    /// Send a Ping frame to every connection (heartbeat keep-alive).
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for TrackingHub {
    fn default() -> Self {
        Self::new()
    }
}
