//! Live-tracking WebSocket infrastructure.
//!
//! - [`hub`] -- room-scoped registry of live connections.
//! - [`protocol`] -- JSON frames exchanged with tracking clients.
//! - [`session`] -- per-connection state machine and persist/broadcast loop.
//! - the upgrade handler, heartbeat task and shutdown drain used by the
//!   router and `main`.

mod handler;
mod heartbeat;
mod shutdown;
pub mod hub;
pub mod protocol;
pub mod session;

pub use handler::tracking_ws_handler;
pub use heartbeat::start_heartbeat;
pub use shutdown::drain_sessions;
pub use hub::TrackingHub;
pub use session::TrackingSession;
