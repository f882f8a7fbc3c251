//! Tracking room (`tracking_data`) and route (`map_points`) models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workout_core::types::{DbId, Timestamp};

/// A tracking room row from the `tracking_data` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackingData {
    pub id: DbId,
    pub exercise_id: DbId,
    pub description: String,
    pub duration: i32,
    pub is_new_set: bool,
    pub is_new_record: bool,
    pub distance_covered: Option<i32>,
    pub created_at: Timestamp,
    pub last_updated_at: Timestamp,
}

/// Request body for opening a tracking room on an exercise.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrackingData {
    pub duration: i32,
    pub description: String,
}

/// Partial aggregate update. Only `Some` fields are written.
///
/// `is_new_set` / `is_new_record` are taken as the client reports them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UpdateTrackingData {
    pub duration: Option<i32>,
    pub is_new_set: Option<bool>,
    pub is_new_record: Option<bool>,
    pub distance_covered: Option<i32>,
}

/// Lightweight listing entry: a tracking room without its route.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackingSummary {
    pub id: DbId,
    pub description: String,
    pub exercise_id: DbId,
    pub duration: i32,
    pub distance_covered: Option<i32>,
    pub created_at: Timestamp,
}

/// A single geolocated ping row from the `map_points` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MapPoint {
    pub id: DbId,
    pub tracking_data_id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Timestamp,
    pub last_updated_at: Timestamp,
}

/// Coordinates of a new ping.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CreateMapPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Route entry as it appears inside a [`TrackingSnapshot`].
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct RoutePoint {
    pub id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub tracking_data_id: DbId,
}

/// A tracking room together with its full route, oldest point first.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingSnapshot {
    pub id: DbId,
    pub exercise_id: DbId,
    pub description: String,
    pub duration: i32,
    pub is_new_set: bool,
    pub is_new_record: bool,
    pub distance_covered: Option<i32>,
    pub created_at: Timestamp,
    pub last_updated_at: Timestamp,
    pub route: Vec<RoutePoint>,
}

impl TrackingSnapshot {
    pub fn new(data: TrackingData, route: Vec<RoutePoint>) -> Self {
        Self {
            id: data.id,
            exercise_id: data.exercise_id,
            description: data.description,
            duration: data.duration,
            is_new_set: data.is_new_set,
            is_new_record: data.is_new_record,
            distance_covered: data.distance_covered,
            created_at: data.created_at,
            last_updated_at: data.last_updated_at,
            route,
        }
    }
}
