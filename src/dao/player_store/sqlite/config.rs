//! Runtime configuration describing how to open the SQLite player database.

use std::path::PathBuf;
use std::time::Duration;

/// Default busy timeout applied to the connection.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the database lives.
#[derive(Debug, Clone)]
pub enum SqliteTarget {
    /// Durable database file on disk.
    File(PathBuf),
    /// Private in-memory database. Contents are lost when the connection
    /// closes; intended for tests.
    Memory,
}

/// Runtime configuration for [`SqlitePlayerStore`](super::SqlitePlayerStore).
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database location.
    pub target: SqliteTarget,
    /// Busy timeout applied to the connection.
    pub busy_timeout: Duration,
}

impl SqliteConfig {
    /// Configuration for a durable database file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: SqliteTarget::File(path.into()),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Configuration for a throwaway in-memory database.
    pub fn in_memory() -> Self {
        Self {
            target: SqliteTarget::Memory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}
