//! Player-facing request and response payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{dao::models::PlayerEntity, state::sessions::SessionEntry};

/// Payload used to register a brand-new player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Desired unique nick (1-32 bytes, case-sensitive).
    #[validate(length(min = 1, max = 32))]
    pub nick: String,
    /// Raw password; only its salted hash is ever stored.
    #[validate(length(min = 1))]
    pub pass: String,
}

/// Credentials supplied when logging in.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ConnectRequest {
    /// Registered nick.
    #[validate(length(min = 1, max = 32))]
    pub nick: String,
    /// Raw password to verify.
    #[validate(length(min = 1))]
    pub pass: String,
    /// Lobby avatar to display while logged in.
    #[serde(default)]
    pub avatar: u8,
}

/// Session issued by a successful login, along with lifetime stats.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectResponse {
    /// Opaque session token required on authenticated calls.
    pub token: Uuid,
    /// Lifetime match wins.
    pub wins: u32,
    /// Lifetime match losses.
    pub losses: u32,
}

/// Public summary of a registered player. Never carries the verifier.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Stable player identifier.
    pub id: i64,
    /// Unique nick.
    pub nick: String,
    /// Lifetime match wins.
    pub wins: u32,
    /// Lifetime match losses.
    pub losses: u32,
}

impl From<PlayerEntity> for PlayerSummary {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id,
            nick: entity.nick,
            wins: entity.wins,
            losses: entity.losses,
        }
    }
}

/// Payload closing a session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LogoutRequest {
    /// Token of the session to close.
    pub token: Uuid,
}

/// Outcome of a logout call. Logout is idempotent, so this is informational
/// only: `closed` is false when the token was already gone.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    /// Whether a session was actually closed by this call.
    pub closed: bool,
}

/// One logged-in player as reported by the lobby listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivePlayer {
    /// Nick of the logged-in player.
    pub nick: String,
    /// Lobby avatar chosen at login.
    pub avatar: u8,
    /// Login timestamp in unix milliseconds.
    pub login_time_ms: u64,
}

impl From<SessionEntry> for ActivePlayer {
    fn from(entry: SessionEntry) -> Self {
        Self {
            nick: entry.nick,
            avatar: entry.avatar,
            login_time_ms: entry.login_time_ms,
        }
    }
}

/// Lobby listing of all logged-in players, in login order.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivePlayersResponse {
    /// Logged-in players, oldest login first.
    pub players: Vec<ActivePlayer>,
}
