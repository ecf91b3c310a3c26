//! Shared application state: the installed player store, the session
//! registry, and the chat log. These three are the only shared mutable
//! state in the process, and each serializes access internally.

/// Bounded chat message buffer.
pub mod chat;
/// Capacity-bounded session registry.
pub mod sessions;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{RwLock, watch};

use crate::{
    config::AppConfig, dao::player_store::PlayerStore, error::ServiceError,
    state::chat::ChatLog, state::sessions::SessionRegistry,
};

/// Shared handle to [`AppState`].
pub type SharedState = Arc<AppState>;

/// Central application state passed to every handler.
pub struct AppState {
    config: AppConfig,
    player_store: RwLock<Option<Arc<dyn PlayerStore>>>,
    degraded: watch::Sender<bool>,
    sessions: SessionRegistry,
    chat: ChatLog,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply. The application starts in degraded mode until a player store
    /// is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        let sessions = SessionRegistry::new(config.max_active_players);
        let chat = ChatLog::new(
            config.chat_retention,
            config.chat_cap,
            config.chat_max_text_bytes,
        );
        Arc::new(Self {
            config,
            player_store: RwLock::new(None),
            degraded: degraded_tx,
            sessions,
            chat,
        })
    }

    /// The immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current player store, if one is installed.
    pub async fn player_store(&self) -> Option<Arc<dyn PlayerStore>> {
        let guard = self.player_store.read().await;
        guard.as_ref().cloned()
    }

    /// Player store handle, or [`ServiceError::Degraded`] while storage is
    /// down.
    pub async fn require_player_store(&self) -> Result<Arc<dyn PlayerStore>, ServiceError> {
        self.player_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new player store implementation and leave degraded mode.
    pub async fn set_player_store(&self, store: Arc<dyn PlayerStore>) {
        {
            let mut guard = self.player_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current player store and enter degraded mode.
    pub async fn clear_player_store(&self) {
        {
            let mut guard = self.player_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.player_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Registry of currently logged-in players.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Rolling buffer of recent chat messages.
    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// Update and broadcast the degraded flag.
    pub(crate) async fn update_degraded(&self, value: bool) {
        let _ = self.degraded.send(value);
    }
}

/// Current time as unix milliseconds. Clock jumps before the epoch collapse
/// to zero rather than panicking.
pub(crate) fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
