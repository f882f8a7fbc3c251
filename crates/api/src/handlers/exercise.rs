//! Handlers for the `/exercise` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use workout_core::error::CoreError;
use workout_core::exercise_type::ExerciseType;
use workout_core::types::DbId;
use workout_db::models::exercise::{CreateExercise, Exercise};
use workout_db::repositories::ExerciseRepo;

use crate::error::AppResult;
use crate::handlers::workout::ensure_non_negative;
use crate::middleware::auth::AuthUser;
use crate::ownership::{authorize_exercise, verify_workout_owner};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /exercise`.
#[derive(Debug, Deserialize)]
pub struct ExerciseListParams {
    pub workout_id: DbId,
}

/// POST /api/v1/exercise/create
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateExercise>,
) -> AppResult<(StatusCode, Json<DataResponse<DbId>>)> {
    verify_workout_owner(&state.pool, auth.user_id, input.workout_id).await?;

    input.exercise_type = input.exercise_type.parse::<ExerciseType>()?.to_string();
    ensure_non_negative("duration", input.duration)?;
    ensure_non_negative("calories", input.calories)?;

    let exercise = ExerciseRepo::create(&state.pool, &input, Utc::now()).await?;

    tracing::info!(
        user_id = auth.user_id,
        workout_id = input.workout_id,
        exercise_id = exercise.id,
        "Exercise created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message("Exercise created", exercise.id)),
    ))
}

/// GET /api/v1/exercise?workout_id={id}
pub async fn list_by_workout(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ExerciseListParams>,
) -> AppResult<Json<DataResponse<Vec<Exercise>>>> {
    verify_workout_owner(&state.pool, auth.user_id, params.workout_id).await?;
    let exercises = ExerciseRepo::list_by_workout(&state.pool, params.workout_id).await?;
    Ok(Json(DataResponse::new(exercises)))
}

/// GET /api/v1/exercise/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Exercise>>> {
    authorize_exercise(&state.pool, auth.user_id, id).await?;
    let exercise = ExerciseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Exercise", id))?;
    Ok(Json(DataResponse::new(exercise)))
}
