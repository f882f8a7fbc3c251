//! Ownership checks over the User -> Workout -> Exercise -> TrackingData ->
//! MapPoint hierarchy.
//!
//! Everything below a workout is authorized by walking up to its workout and
//! calling [`verify_workout_owner`]. Every hop is looked up again on every
//! call, even when the caller already holds the row, so a resource deleted
//! since the last check is reported as not found instead of being written to.
//!
//! Handlers and the live-tracking session call these helpers; none of them
//! compare owners themselves.

use workout_core::error::CoreError;
use workout_core::types::DbId;
use workout_db::models::tracking::{MapPoint, TrackingData};
use workout_db::repositories::{ExerciseRepo, MapPointRepo, TrackingDataRepo, WorkoutRepo};
use workout_db::DbPool;

use crate::error::AppResult;

/// Succeeds only if workout `workout_id` exists and belongs to `user_id`.
pub async fn verify_workout_owner(pool: &DbPool, user_id: DbId, workout_id: DbId) -> AppResult<()> {
    let owner_id = WorkoutRepo::find_owner_id(pool, workout_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Workout", workout_id))?;

    if owner_id != user_id {
        tracing::warn!(user_id, workout_id, "Ownership check failed");
        return Err(CoreError::Forbidden("Workout belongs to another user".into()).into());
    }
    Ok(())
}

/// The workout an exercise belongs to.
pub async fn resolve_exercise_workout(pool: &DbPool, exercise_id: DbId) -> AppResult<DbId> {
    let workout_id = ExerciseRepo::find_workout_id(pool, exercise_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Exercise", exercise_id))?;
    Ok(workout_id)
}

/// Exercise -> Workout -> owner. Returns the workout id.
pub async fn authorize_exercise(pool: &DbPool, user_id: DbId, exercise_id: DbId) -> AppResult<DbId> {
    let workout_id = resolve_exercise_workout(pool, exercise_id).await?;
    verify_workout_owner(pool, user_id, workout_id).await?;
    Ok(workout_id)
}

/// TrackingData -> Exercise -> Workout -> owner. Returns the room row.
pub async fn authorize_tracking_data(
    pool: &DbPool,
    user_id: DbId,
    tracking_data_id: DbId,
) -> AppResult<TrackingData> {
    let room = TrackingDataRepo::find_by_id(pool, tracking_data_id)
        .await?
        .ok_or_else(|| CoreError::not_found("TrackingData", tracking_data_id))?;
    authorize_exercise(pool, user_id, room.exercise_id).await?;
    Ok(room)
}

/// MapPoint -> TrackingData -> Exercise -> Workout -> owner. Returns the point.
pub async fn authorize_map_point(
    pool: &DbPool,
    user_id: DbId,
    map_point_id: DbId,
) -> AppResult<MapPoint> {
    let point = MapPointRepo::find_by_id(pool, map_point_id)
        .await?
        .ok_or_else(|| CoreError::not_found("MapPoint", map_point_id))?;
    authorize_tracking_data(pool, user_id, point.tracking_data_id).await?;
    Ok(point)
}
