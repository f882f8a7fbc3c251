//! JSON frames exchanged on the live-tracking socket.
//!
//! Client -> server: [`ClientMessage`].
//! Server -> client: [`StatusNotice`] and [`TrackingSnapshot`], both as text
//! frames.

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use workout_core::tracking::StatusNotice;
use workout_db::models::tracking::{CreateMapPoint, TrackingSnapshot, UpdateTrackingData};

/// One ping from the tracking client.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClientMessage {
    pub map_point: CreateMapPoint,
    #[serde(default)]
    pub update_tracking_data: bool,
    #[serde(default)]
    pub updated_tracking_data: Option<UpdateTrackingData>,
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The aggregate update this message asks for, if any.
    ///
    /// With `update_tracking_data` set but no payload, the update is empty;
    /// applying it still refreshes `last_updated_at`.
    pub fn aggregate_update(&self) -> Option<UpdateTrackingData> {
        self.update_tracking_data
            .then(|| self.updated_tracking_data.clone().unwrap_or_default())
    }
}

pub fn notice_frame(notice: &StatusNotice) -> Result<Message, serde_json::Error> {
    to_text_frame(notice)
}

pub fn snapshot_frame(snapshot: &TrackingSnapshot) -> Result<Message, serde_json::Error> {
    to_text_frame(snapshot)
}

fn to_text_frame<T: Serialize>(value: &T) -> Result<Message, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    Ok(Message::Text(json.into()))
}
