use std::time::Duration;

use tokio_util::task::TaskTracker;

use crate::ws::hub::TrackingHub;

/// Close every live-tracking connection and wait for the session tasks to
/// finish.
///
/// Each session sees its socket close and runs its normal close path before
/// its task ends. Returns `false` if sessions were still running when
/// `within` elapsed.
pub async fn drain_sessions(hub: &TrackingHub, sessions: &TaskTracker, within: Duration) -> bool {
    sessions.close();
    let running = sessions.len();
    hub.shutdown_all().await;

    match tokio::time::timeout(within, sessions.wait()).await {
        Ok(()) => {
            tracing::info!(running, "Live tracking sessions drained");
            true
        }
        Err(_) => {
            tracing::warn!(
                remaining = sessions.len(),
                timeout_secs = within.as_secs(),
                "Timed out draining live tracking sessions"
            );
            false
        }
    }
}
