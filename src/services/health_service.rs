//! Health check service.

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the current health payload while logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let active_players = state.sessions().len().await;

    match state.require_player_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        Err(_) => warn!("storage unavailable (degraded mode)"),
    }

    if state.is_degraded().await {
        HealthResponse::degraded(active_players)
    } else {
        HealthResponse::ok(active_players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::test_state;

    #[tokio::test]
    async fn healthy_state_reports_ok() {
        let state = test_state(4).await;

        let response = health_status(&state).await;

        assert_eq!(response.status, "ok");
        assert_eq!(response.active_players, 0);
    }

    #[tokio::test]
    async fn degraded_state_is_reported() {
        let state = test_state(4).await;
        state.clear_player_store().await;

        let response = health_status(&state).await;

        assert_eq!(response.status, "degraded");
    }
}
