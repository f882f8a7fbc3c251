//! Route definitions for the `/exercise` resource, including the
//! live-tracking endpoints nested beneath it.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{exercise, tracking};
use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/exercise`.
///
/// ```text
/// GET    /?workout_id=                      -> list_by_workout
/// POST   /create                            -> create
/// GET    /{id}                              -> get_by_id
///
/// POST   /tracking/{exercise_id}            -> tracking::create_room
/// GET    /tracking/list/{exercise_id}       -> tracking::list
/// GET    /tracking/room/{tracking_data_id}  -> tracking::snapshot
/// GET    /ws/tracking/{tracking_data_id}    -> WebSocket upgrade
/// ```
pub fn router() -> Router<AppState> {
    let tracking_routes = Router::new()
        .route("/{exercise_id}", post(tracking::create_room))
        .route("/list/{exercise_id}", get(tracking::list))
        .route("/room/{tracking_data_id}", get(tracking::snapshot));

    Router::new()
        .route("/", get(exercise::list_by_workout))
        .route("/create", post(exercise::create))
        .route("/{id}", get(exercise::get_by_id))
        .nest("/tracking", tracking_routes)
        .route("/ws/tracking/{tracking_data_id}", get(ws::tracking_ws_handler))
}
