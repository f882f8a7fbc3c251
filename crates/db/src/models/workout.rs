//! Workout entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workout_core::types::{DbId, Timestamp};

/// A workout row from the `workouts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workout {
    pub id: DbId,
    pub user_id: DbId,
    pub workout_type: String,
    pub duration: i32,
    pub calories: i32,
    pub is_schedule: bool,
    pub schedule_date: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for creating a workout. The owner comes from the authenticated user,
/// never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkout {
    pub workout_type: String,
    pub duration: i32,
    pub calories: i32,
    /// When present the workout is a scheduled one; otherwise it is dated now.
    pub schedule_date: Option<Timestamp>,
}
