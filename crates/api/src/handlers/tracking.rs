//! Handlers for tracking rooms: creation, listing, and snapshots.
//!
//! The live stream itself is served by [`crate::ws::tracking_ws_handler`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use workout_core::error::CoreError;
use workout_core::types::DbId;
use workout_db::models::tracking::{CreateTrackingData, TrackingSnapshot, TrackingSummary};
use workout_db::repositories::TrackingDataRepo;

use crate::error::AppResult;
use crate::handlers::workout::ensure_non_negative;
use crate::middleware::auth::AuthUser;
use crate::ownership::{authorize_exercise, authorize_tracking_data};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/exercise/tracking/{exercise_id}
///
/// Responds with the new room id, which the client then uses to open the
/// live-tracking socket.
pub async fn create_room(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(exercise_id): Path<DbId>,
    Json(input): Json<CreateTrackingData>,
) -> AppResult<(StatusCode, Json<DataResponse<DbId>>)> {
    authorize_exercise(&state.pool, auth.user_id, exercise_id).await?;
    ensure_non_negative("duration", input.duration)?;

    let room = TrackingDataRepo::create(&state.pool, exercise_id, &input, Utc::now()).await?;

    tracing::info!(
        user_id = auth.user_id,
        exercise_id,
        tracking_data_id = room.id,
        "Tracking room created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message("Tracking room created", room.id)),
    ))
}

/// GET /api/v1/exercise/tracking/list/{exercise_id}
///
/// 404 when the exercise has no tracking rooms yet.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(exercise_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TrackingSummary>>>> {
    authorize_exercise(&state.pool, auth.user_id, exercise_id).await?;

    let rooms = TrackingDataRepo::list_by_exercise(&state.pool, exercise_id).await?;
    if rooms.is_empty() {
        return Err(CoreError::not_found("Tracking data for exercise", exercise_id).into());
    }
    Ok(Json(DataResponse::new(rooms)))
}

/// GET /api/v1/exercise/tracking/room/{tracking_data_id}
pub async fn snapshot(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(tracking_data_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TrackingSnapshot>>> {
    authorize_tracking_data(&state.pool, auth.user_id, tracking_data_id).await?;

    let snapshot = TrackingDataRepo::snapshot(&state.pool, tracking_data_id)
        .await?
        .ok_or_else(|| CoreError::not_found("TrackingData", tracking_data_id))?;
    Ok(Json(DataResponse::new(snapshot)))
}
