//! Health check payload.

use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of currently logged-in players.
    pub active_players: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(active_players: usize) -> Self {
        Self {
            status: "ok".to_string(),
            active_players,
        }
    }

    /// Create a health response indicating the system is in degraded mode.
    pub fn degraded(active_players: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            active_players,
        }
    }
}
