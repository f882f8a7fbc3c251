pub mod exercise;
pub mod health;
pub mod users;
pub mod workout;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                                           login (public)
/// /users/register                                  register (public)
/// /users/me                                        current user
///
/// /workout                                         list own workouts
/// /workout/create                                  create
/// /workout/{id}                                    get, delete (cascades)
///
/// /exercise?workout_id=                            list by workout
/// /exercise/create                                 create
/// /exercise/{id}                                   get
/// /exercise/tracking/{exercise_id}                 create tracking room (POST)
/// /exercise/tracking/list/{exercise_id}            list tracking rooms
/// /exercise/tracking/room/{tracking_data_id}       room snapshot
/// /exercise/ws/tracking/{tracking_data_id}         live tracking WebSocket
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::users::login))
        .nest("/users", users::router())
        .nest("/workout", workout::router())
        .nest("/exercise", exercise::router())
}
