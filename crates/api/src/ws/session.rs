//! Per-connection live-tracking loop body, independent of the socket.
//!
//! The WebSocket handler feeds inbound text frames to
//! [`TrackingSession::handle_text`]; everything the session says goes out
//! through the [`TrackingHub`] to the room's listeners, including the
//! connection that sent the message.

use std::sync::Arc;

use axum::extract::ws::Message;
use chrono::Utc;
use tokio::sync::mpsc;
use workout_core::error::CoreError;
use workout_core::tracking::{SessionEvent, SessionState, StatusNotice};
use workout_core::types::DbId;
use workout_db::models::tracking::UpdateTrackingData;
use workout_db::repositories::TrackingDataRepo;
use workout_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::workout::ensure_non_negative;
use crate::ownership::authorize_tracking_data;
use crate::ws::hub::TrackingHub;
use crate::ws::protocol::{notice_frame, snapshot_frame, ClientMessage};

pub struct TrackingSession {
    conn_id: String,
    user_id: DbId,
    tracking_data_id: DbId,
    state: SessionState,
    pool: DbPool,
    hub: Arc<TrackingHub>,
}

impl TrackingSession {
    /// Register a new connection on `tracking_data_id` and return the session
    /// (in `Open`) with the receiver for its outbound frames.
    ///
    /// The caller must already have authorized `user_id` for the room.
    pub async fn open(
        pool: DbPool,
        hub: Arc<TrackingHub>,
        user_id: DbId,
        tracking_data_id: DbId,
    ) -> AppResult<(Self, mpsc::UnboundedReceiver<Message>)> {
        let conn_id = uuid::Uuid::new_v4().to_string();
        let rx = hub.register(conn_id.clone(), tracking_data_id, user_id).await;

        let mut session = Self {
            conn_id,
            user_id,
            tracking_data_id,
            state: SessionState::Idle,
            pool,
            hub,
        };
        session.transition(SessionEvent::Registered)?;
        tracing::info!(
            conn_id = %session.conn_id,
            user_id,
            tracking_data_id,
            "Live tracking session opened"
        );
        Ok((session, rx))
    }

    pub fn conn_id(&self) -> &str {
        &self.conn_id
    }

    pub fn tracking_data_id(&self) -> DbId {
        self.tracking_data_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Broadcast the start notice and begin accepting messages.
    pub async fn announce_start(&mut self) -> AppResult<()> {
        self.transition(SessionEvent::Announced)?;
        self.broadcast_notice(&StatusNotice::started()).await;
        Ok(())
    }

    /// Handle one inbound text frame.
    ///
    /// Persistence or authorization failures are reported to the room as a
    /// "not updated" notice and do not end the session. Returns whether the
    /// message was persisted. Only an illegal state transition is an error.
    pub async fn handle_text(&mut self, text: &str) -> AppResult<bool> {
        self.transition(SessionEvent::MessageReceived)?;

        let persisted = match self.persist(text).await {
            Ok(()) => {
                self.broadcast_notice(&StatusNotice::updated()).await;
                self.broadcast_snapshot().await;
                true
            }
            Err(e) => {
                tracing::warn!(
                    conn_id = %self.conn_id,
                    tracking_data_id = self.tracking_data_id,
                    error = %e,
                    "Tracking message not persisted"
                );
                self.broadcast_notice(&StatusNotice::not_updated()).await;
                false
            }
        };

        self.transition(SessionEvent::MessageHandled)?;
        Ok(persisted)
    }

    /// Broadcast the stop notice and leave the hub.
    pub async fn close(mut self) {
        if self.transition(SessionEvent::Disconnected).is_err() {
            return;
        }
        self.broadcast_notice(&StatusNotice::stopped()).await;
        self.hub.deregister(&self.conn_id).await;
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Parse, re-authorize, then record the ping in one transaction.
    async fn persist(&self, text: &str) -> AppResult<()> {
        let message = ClientMessage::parse(text)
            .map_err(|e| AppError::BadRequest(format!("Malformed tracking message: {e}")))?;

        authorize_tracking_data(&self.pool, self.user_id, self.tracking_data_id).await?;

        let update = message.aggregate_update();
        if let Some(update) = &update {
            check_aggregates(update)?;
        }

        TrackingDataRepo::record_ping(
            &self.pool,
            self.tracking_data_id,
            &message.map_point,
            update.as_ref(),
            Utc::now(),
        )
        .await?
        .ok_or_else(|| CoreError::not_found("TrackingData", self.tracking_data_id))?;

        Ok(())
    }

    async fn broadcast_snapshot(&self) {
        let snapshot = match TrackingDataRepo::snapshot(&self.pool, self.tracking_data_id).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::warn!(
                    tracking_data_id = self.tracking_data_id,
                    "Room vanished before snapshot"
                );
                return;
            }
            Err(e) => {
                tracing::error!(
                    tracking_data_id = self.tracking_data_id,
                    error = %e,
                    "Failed to load snapshot"
                );
                return;
            }
        };

        match snapshot_frame(&snapshot) {
            Ok(frame) => {
                self.hub.broadcast(self.tracking_data_id, frame).await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to encode snapshot"),
        }
    }

    async fn broadcast_notice(&self, notice: &StatusNotice) {
        match notice_frame(notice) {
            Ok(frame) => {
                let count = self.hub.broadcast(self.tracking_data_id, frame).await;
                tracing::debug!(
                    tracking_data_id = self.tracking_data_id,
                    count,
                    message = %notice.message,
                    "Broadcast status notice"
                );
            }
            Err(e) => tracing::error!(error = %e, "Failed to encode status notice"),
        }
    }

    fn transition(&mut self, event: SessionEvent) -> AppResult<()> {
        self.state = self.state.on(event)?;
        Ok(())
    }
}

/// Same bounds as room creation: no negative duration or distance.
fn check_aggregates(update: &UpdateTrackingData) -> Result<(), CoreError> {
    if let Some(duration) = update.duration {
        ensure_non_negative("duration", duration)?;
    }
    if let Some(distance) = update.distance_covered {
        ensure_non_negative("distance_covered", distance)?;
    }
    Ok(())
}
