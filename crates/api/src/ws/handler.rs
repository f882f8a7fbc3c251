use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use workout_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::ownership::authorize_tracking_data;
use crate::state::AppState;
use crate::ws::session::TrackingSession;

/// How long a closing session waits for its writer to flush queued frames.
const WRITER_FLUSH_TIMEOUT_SECS: u64 = 5;

/// GET /api/v1/exercise/ws/tracking/{tracking_data_id}
///
/// Authenticates and runs the ownership cascade before upgrading, so a bad
/// token or foreign room is answered with a plain 401/403/404.
pub async fn tracking_ws_handler(
    auth: AuthUser,
    Path(tracking_data_id): Path<DbId>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    authorize_tracking_data(&state.pool, auth.user_id, tracking_data_id).await?;

    // Upgraded connections outlive axum's graceful shutdown, so the session
    // task is tracked separately and drained by `main`.
    Ok(ws.on_upgrade(move |socket| {
        let sessions = state.sessions.clone();
        sessions.track_future(handle_socket(socket, state, auth.user_id, tracking_data_id))
    }))
}

/// Manage a single live-tracking connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the session with the hub.
///   2. Spawns a sender task that forwards hub messages to the sink.
///   3. Announces the start and handles inbound frames one at a time.
///   4. Announces the stop, deregisters, and lets the sender drain.
async fn handle_socket(socket: WebSocket, state: AppState, user_id: DbId, tracking_data_id: DbId) {
    let (mut session, mut rx) =
        match TrackingSession::open(state.pool.clone(), state.hub.clone(), user_id, tracking_data_id)
            .await
        {
            Ok(opened) => opened,
            Err(e) => {
                tracing::error!(tracking_data_id, error = %e, "Failed to open tracking session");
                return;
            }
        };
    let conn_id = session.conn_id().to_string();

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    if let Err(e) = session.announce_start().await {
        tracing::error!(conn_id = %conn_id, error = %e, "Failed to start tracking session");
    } else {
        // Receiver loop: one message at a time keeps the route in send order.
        while let Some(result) = stream.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if let Err(e) = session.handle_text(text.as_str()).await {
                        tracing::error!(conn_id = %conn_id, error = %e, "Tracking session failed");
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(conn_id = %conn_id, "Binary frame on tracking socket, closing");
                    break;
                }
                Ok(Message::Close(_)) => break,
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    tracing::trace!(conn_id = %conn_id, "Ping/Pong received");
                }
                Err(e) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
    }

    session.close().await;

    let flush = Duration::from_secs(WRITER_FLUSH_TIMEOUT_SECS);
    if tokio::time::timeout(flush, &mut send_task).await.is_err() {
        send_task.abort();
    }
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
