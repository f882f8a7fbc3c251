use std::sync::Arc;
use std::time::Duration;

use crate::ws::hub::TrackingHub;

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that sends periodic Ping frames to every
/// live-tracking connection.
///
/// Pings only keep intermediaries from dropping quiet sockets; idle sessions
/// are never closed from here. Abort the returned handle on shutdown.
pub fn start_heartbeat(hub: Arc<TrackingHub>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let count = hub.connection_count().await;
            if count > 0 {
                tracing::debug!(count, "Live tracking heartbeat ping");
                hub.ping_all().await;
            }
        }
    })
}
