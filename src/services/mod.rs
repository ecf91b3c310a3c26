//! Service layer: the operations the HTTP routes delegate to.

/// Chat posting and time-windowed retrieval.
pub mod chat_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Registration, login/logout, and the lobby listing.
pub mod player_service;
/// Idle-session background sweep.
pub mod session_sweeper;
/// Storage reconnection supervisor.
pub mod storage_supervisor;

use std::future::Future;

use crate::{dao::storage::StorageResult, error::ServiceError, state::SharedState};

/// Run a storage operation under the configured deadline. Expiry surfaces as
/// [`ServiceError::Timeout`] instead of hanging the caller.
pub(crate) async fn with_storage_timeout<T>(
    state: &SharedState,
    operation: impl Future<Output = StorageResult<T>>,
) -> Result<T, ServiceError> {
    match tokio::time::timeout(state.config().storage_timeout, operation).await {
        Ok(result) => result.map_err(ServiceError::from),
        Err(_) => Err(ServiceError::Timeout),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers shared by the service tests.

    use crate::{
        config::AppConfig,
        dao::player_store::sqlite::{SqliteConfig, SqlitePlayerStore},
        state::{AppState, SharedState},
    };

    /// Shared state backed by a fresh in-memory database.
    pub(crate) async fn test_state(max_players: usize) -> SharedState {
        let config = AppConfig {
            max_active_players: max_players,
            ..AppConfig::default()
        };
        let state = AppState::new(config);
        let store = SqlitePlayerStore::connect(SqliteConfig::in_memory())
            .await
            .expect("in-memory store");
        state.set_player_store(store).await;
        state
    }
}
