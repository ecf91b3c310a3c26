//! Application-level configuration: bind address, database path, and the
//! capacity/retention knobs for sessions and chat.

use std::{env, path::PathBuf, time::Duration};

use tracing::warn;

/// Default TCP port the server listens on.
const DEFAULT_PORT: u16 = 5555;
/// Default SQLite database file holding the player table.
const DEFAULT_DB_PATH: &str = "player_data.db";
/// Default bound on concurrently logged-in players.
const DEFAULT_MAX_ACTIVE_PLAYERS: usize = 64;
/// Default rolling retention window for chat messages.
const DEFAULT_CHAT_RETENTION: Duration = Duration::from_secs(5 * 60);
/// Default hard cap on retained chat messages.
const DEFAULT_CHAT_CAP: usize = 1024;
/// Default upper bound on a single chat message, in bytes.
const DEFAULT_CHAT_MAX_TEXT_BYTES: usize = 512;
/// Default idle time after which a session is swept.
const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(10 * 60);
/// Default interval between idle-session sweeps.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);
/// Default deadline for a single storage call.
const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Interface the HTTP listener binds to.
    pub host: String,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Maximum number of concurrently logged-in players.
    pub max_active_players: usize,
    /// Rolling window beyond which chat messages are evicted.
    pub chat_retention: Duration,
    /// Hard cap on retained chat messages.
    pub chat_cap: usize,
    /// Upper bound on a single chat message, in bytes.
    pub chat_max_text_bytes: usize,
    /// Idle time after which a session is swept.
    pub session_idle: Duration,
    /// Interval between idle-session sweeps.
    pub sweep_interval: Duration,
    /// Deadline applied to every storage call.
    pub storage_timeout: Duration,
}

impl AppConfig {
    /// Build a configuration from environment variables, falling back to the
    /// baked-in defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(host) = env::var("LOBBY_BACK_HOST").ok().filter(|h| !h.is_empty()) {
            config.host = host;
        }
        if let Some(port) = parse_env("PORT").or_else(|| parse_env("LOBBY_BACK_PORT")) {
            config.port = port;
        }
        if let Some(path) = env::var_os("LOBBY_BACK_DB_PATH").filter(|p| !p.is_empty()) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(max) = parse_env("LOBBY_BACK_MAX_PLAYERS") {
            config.max_active_players = max;
        }
        if let Some(secs) = parse_env("LOBBY_BACK_CHAT_RETENTION_SECS") {
            config.chat_retention = Duration::from_secs(secs);
        }
        if let Some(cap) = parse_env("LOBBY_BACK_CHAT_CAP") {
            config.chat_cap = cap;
        }
        if let Some(bytes) = parse_env("LOBBY_BACK_CHAT_MAX_TEXT_BYTES") {
            config.chat_max_text_bytes = bytes;
        }
        if let Some(secs) = parse_env("LOBBY_BACK_SESSION_IDLE_SECS") {
            config.session_idle = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env("LOBBY_BACK_SWEEP_INTERVAL_SECS") {
            config.sweep_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env("LOBBY_BACK_STORAGE_TIMEOUT_SECS") {
            config.storage_timeout = Duration::from_secs(secs);
        }

        config
    }
}


impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            max_active_players: DEFAULT_MAX_ACTIVE_PLAYERS,
            chat_retention: DEFAULT_CHAT_RETENTION,
            chat_cap: DEFAULT_CHAT_CAP,
            chat_max_text_bytes: DEFAULT_CHAT_MAX_TEXT_BYTES,
            session_idle: DEFAULT_SESSION_IDLE,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }
}

/// Read and parse an environment variable, warning when the value is present
/// but malformed.
fn parse_env<T: std::str::FromStr>(var: &str) -> Option<T> {
    let raw = env::var(var).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}
