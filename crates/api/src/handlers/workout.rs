//! Handlers for the `/workout` resource. Every route is scoped to the
//! authenticated user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use workout_core::error::CoreError;
use workout_core::exercise_type::ExerciseType;
use workout_core::types::DbId;
use workout_db::models::workout::{CreateWorkout, Workout};
use workout_db::repositories::WorkoutRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::ownership::verify_workout_owner;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/workout/create
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateWorkout>,
) -> AppResult<(StatusCode, Json<DataResponse<DbId>>)> {
    input.workout_type = input.workout_type.parse::<ExerciseType>()?.to_string();
    ensure_non_negative("duration", input.duration)?;
    ensure_non_negative("calories", input.calories)?;

    let workout = WorkoutRepo::create(&state.pool, auth.user_id, &input, Utc::now()).await?;

    tracing::info!(user_id = auth.user_id, workout_id = workout.id, "Workout created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message("Workout created", workout.id)),
    ))
}

/// GET /api/v1/workout
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Workout>>>> {
    let workouts = WorkoutRepo::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(workouts)))
}

/// GET /api/v1/workout/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Workout>>> {
    verify_workout_owner(&state.pool, auth.user_id, id).await?;
    let workout = WorkoutRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Workout", id))?;
    Ok(Json(DataResponse::new(workout)))
}

/// DELETE /api/v1/workout/{id}
///
/// Removes the workout's exercises, tracking rooms and routes with it.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    verify_workout_owner(&state.pool, auth.user_id, id).await?;
    if WorkoutRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = auth.user_id, workout_id = id, "Workout deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Workout", id).into())
    }
}

/// Reject negative durations and calorie counts.
pub(crate) fn ensure_non_negative(field: &str, value: i32) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!("{field} must not be negative")));
    }
    Ok(())
}
