//! In-memory registry of currently logged-in players.
//!
//! Owns every [`SessionEntry`] exclusively; the rest of the application only
//! ever sees clones. All operations take one lock, so the capacity check and
//! the insert of a login are a single critical section: concurrent logins can
//! never push the active count past the bound.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::now_unix_millis;

/// Errors raised by the session registry.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The active-player bound has been reached.
    #[error("server is at capacity ({max} active players)")]
    AtCapacity {
        /// The configured bound.
        max: usize,
    },
    /// The player already holds an active session.
    #[error("player `{nick}` is already logged in")]
    AlreadyLoggedIn {
        /// Nick of the already-active player.
        nick: String,
    },
    /// The supplied token does not belong to any active session.
    #[error("invalid session token")]
    InvalidSession,
}

/// A single active session. Referenced by player id only; the registry never
/// holds on to credential-store rows.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// Opaque credential issued at login.
    pub token: Uuid,
    /// Id of the player this session belongs to.
    pub player_id: i64,
    /// Nick captured at login (immutable in the credential store).
    pub nick: String,
    /// Lobby avatar chosen by the client at login.
    pub avatar: u8,
    /// Login timestamp in unix milliseconds.
    pub login_time_ms: u64,
    /// Last time the session was used, for the idle sweep.
    last_seen: Instant,
}

struct Inner {
    /// Active sessions keyed by player id; insertion order is login order,
    /// which is the order `list_active` reports.
    sessions: IndexMap<i64, SessionEntry>,
    /// Token index, kept in sync with `sessions`.
    tokens: HashMap<Uuid, i64>,
}

/// Capacity-bounded table of active sessions.
pub struct SessionRegistry {
    inner: Mutex<Inner>,
    max_active: usize,
}

impl SessionRegistry {
    /// Create an empty registry admitting at most `max_active` players.
    pub fn new(max_active: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sessions: IndexMap::new(),
                tokens: HashMap::new(),
            }),
            max_active,
        }
    }

    /// Admit a player and mint a session token.
    ///
    /// Fails with [`SessionError::AlreadyLoggedIn`] when the player has an
    /// active session and [`SessionError::AtCapacity`] when the registry is
    /// full. Both checks and the insert happen under the same lock.
    pub async fn login(
        &self,
        player_id: i64,
        nick: String,
        avatar: u8,
    ) -> Result<SessionEntry, SessionError> {
        let mut inner = self.inner.lock().await;

        if inner.sessions.contains_key(&player_id) {
            return Err(SessionError::AlreadyLoggedIn { nick });
        }
        if inner.sessions.len() >= self.max_active {
            return Err(SessionError::AtCapacity {
                max: self.max_active,
            });
        }

        let entry = SessionEntry {
            token: Uuid::new_v4(),
            player_id,
            nick,
            avatar,
            login_time_ms: now_unix_millis(),
            last_seen: Instant::now(),
        };

        inner.tokens.insert(entry.token, player_id);
        inner.sessions.insert(player_id, entry.clone());

        info!(player_id, nick = %entry.nick, "session created");
        Ok(entry)
    }

    /// Remove the session bound to `token`.
    ///
    /// Idempotent: an unknown or already-removed token is a no-op, and the
    /// return value only says whether anything was actually removed.
    pub async fn logout(&self, token: Uuid) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(player_id) = inner.tokens.remove(&token) else {
            return false;
        };
        if let Some(entry) = inner.sessions.shift_remove(&player_id) {
            info!(player_id, nick = %entry.nick, "session closed");
        }
        true
    }

    /// Authorize a call: map `token` to its player id and refresh the idle
    /// clock of the session.
    pub async fn resolve(&self, token: Uuid) -> Result<SessionEntry, SessionError> {
        let mut inner = self.inner.lock().await;
        let player_id = *inner
            .tokens
            .get(&token)
            .ok_or(SessionError::InvalidSession)?;
        let entry = inner
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::InvalidSession)?;
        entry.last_seen = Instant::now();
        Ok(entry.clone())
    }

    /// Snapshot of all active sessions in login order.
    pub async fn list_active(&self) -> Vec<SessionEntry> {
        let inner = self.inner.lock().await;
        inner.sessions.values().cloned().collect()
    }

    /// Drop every session idle for longer than `idle`, returning the removed
    /// entries so callers can log or notify.
    pub async fn sweep_idle(&self, idle: Duration) -> Vec<SessionEntry> {
        let mut inner = self.inner.lock().await;

        let stale: Vec<i64> = inner
            .sessions
            .values()
            .filter(|entry| entry.last_seen.elapsed() > idle)
            .map(|entry| entry.player_id)
            .collect();

        let mut removed = Vec::with_capacity(stale.len());
        for player_id in stale {
            if let Some(entry) = inner.sessions.shift_remove(&player_id) {
                inner.tokens.remove(&entry.token);
                info!(player_id, nick = %entry.nick, "session expired (idle)");
                removed.push(entry);
            }
        }
        removed
    }

    /// Number of active sessions.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    /// True when no player is logged in.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
