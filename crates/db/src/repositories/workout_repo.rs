//! Repository for the `workouts` table.

use sqlx::PgPool;
use workout_core::types::{DbId, Timestamp};

use crate::models::workout::{CreateWorkout, Workout};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, workout_type, duration, calories, is_schedule, schedule_date, created_at";

/// Provides create / read / delete for workouts.
pub struct WorkoutRepo;

impl WorkoutRepo {
    /// Insert a workout owned by `user_id`.
    ///
    /// A workout without `schedule_date` is unscheduled and dated `now`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateWorkout,
        now: Timestamp,
    ) -> Result<Workout, sqlx::Error> {
        let query = format!(
            "INSERT INTO workouts
                (user_id, workout_type, duration, calories, is_schedule, schedule_date, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(user_id)
            .bind(&input.workout_type)
            .bind(input.duration)
            .bind(input.calories)
            .bind(input.schedule_date.is_some())
            .bind(input.schedule_date.unwrap_or(now))
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a workout by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workouts WHERE id = $1");
        sqlx::query_as::<_, Workout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Owner of a workout, or `None` if the workout does not exist.
    pub async fn find_owner_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT user_id FROM workouts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's workouts, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Workout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workouts WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a workout and, via `ON DELETE CASCADE`, its exercises, tracking
    /// rooms and map points. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
