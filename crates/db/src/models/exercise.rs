//! Exercise entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workout_core::types::{DbId, Timestamp};

/// An exercise row from the `exercises` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Exercise {
    pub id: DbId,
    pub workout_id: DbId,
    pub name: String,
    pub exercise_type: String,
    pub duration: i32,
    pub calories: i32,
    pub created_at: Timestamp,
}

/// DTO for creating an exercise under an existing workout.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExercise {
    pub workout_id: DbId,
    pub name: String,
    pub exercise_type: String,
    pub duration: i32,
    pub calories: i32,
}
