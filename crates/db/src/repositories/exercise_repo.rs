//! Repository for the `exercises` table.

use sqlx::PgPool;
use workout_core::types::{DbId, Timestamp};

use crate::models::exercise::{CreateExercise, Exercise};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, workout_id, name, exercise_type, duration, calories, created_at";

/// Provides create / read for exercises.
pub struct ExerciseRepo;

impl ExerciseRepo {
    /// Insert a new exercise, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateExercise,
        now: Timestamp,
    ) -> Result<Exercise, sqlx::Error> {
        let query = format!(
            "INSERT INTO exercises (workout_id, name, exercise_type, duration, calories, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Exercise>(&query)
            .bind(input.workout_id)
            .bind(&input.name)
            .bind(&input.exercise_type)
            .bind(input.duration)
            .bind(input.calories)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find an exercise by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Exercise>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exercises WHERE id = $1");
        sqlx::query_as::<_, Exercise>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Parent workout of an exercise, or `None` if the exercise does not exist.
    pub async fn find_workout_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT workout_id FROM exercises WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the exercises of a workout in creation order.
    pub async fn list_by_workout(
        pool: &PgPool,
        workout_id: DbId,
    ) -> Result<Vec<Exercise>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exercises WHERE workout_id = $1 ORDER BY id");
        sqlx::query_as::<_, Exercise>(&query)
            .bind(workout_id)
            .fetch_all(pool)
            .await
    }
}
