use axum::routing::{get, post};
use axum::Router;

use crate::handlers::workout;
use crate::state::AppState;

/// Routes mounted at `/workout`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /create                            -> create
/// GET    /{id}                              -> get_by_id
/// DELETE /{id}                              -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workout::list))
        .route("/create", post(workout::create))
        .route("/{id}", get(workout::get_by_id).delete(workout::delete))
}
