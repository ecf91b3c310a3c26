//! Background sweep of idle sessions.
//!
//! Sessions die three ways: explicit logout, server shutdown, and this sweep.
//! The sweep pass exists because clients that vanish without a logout would
//! otherwise pin their capacity slot forever.

use tokio::time::interval;
use tracing::debug;

use crate::state::SharedState;

/// Periodically drop sessions idle for longer than the configured timeout.
/// Runs forever; spawn it.
pub async fn run(state: SharedState) {
    let idle = state.config().session_idle;
    let mut ticker = interval(state.config().sweep_interval);

    loop {
        ticker.tick().await;
        let removed = state.sessions().sweep_idle(idle).await;
        if !removed.is_empty() {
            debug!(count = removed.len(), "idle sessions swept");
        }
    }
}
