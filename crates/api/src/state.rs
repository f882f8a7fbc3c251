use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::config::ServerConfig;
use crate::ws::TrackingHub;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else is
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: workout_db::DbPool,
    /// Server configuration (JWT secret, timeouts).
    pub config: Arc<ServerConfig>,
    /// Registry of live-tracking connections.
    pub hub: Arc<TrackingHub>,
    /// Upgraded live-tracking session tasks, awaited on shutdown.
    pub sessions: TaskTracker,
}
