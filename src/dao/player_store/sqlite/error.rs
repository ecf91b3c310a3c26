//! Error types shared by the SQLite storage implementation.

use std::path::PathBuf;

use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`SqliteDaoError`] failures.
pub type SqliteResult<T> = Result<T, SqliteDaoError>;

/// Failures that can occur while interacting with SQLite.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// The database file could not be opened or migrated.
    #[error("failed to open SQLite database at `{path}`")]
    Open {
        /// Path of the database file.
        path: PathBuf,
        /// Underlying driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// A query failed for a reason other than a constraint violation.
    #[error("SQLite query `{operation}` failed")]
    Query {
        /// Short name of the failed operation.
        operation: &'static str,
        /// Underlying driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// The unique nick constraint rejected an insert.
    #[error("nick `{nick}` is already registered")]
    NickTaken {
        /// The duplicated nick.
        nick: String,
    },
    /// The blocking task running the query was cancelled or panicked.
    #[error("SQLite worker task failed")]
    Task {
        /// Join error from the runtime.
        #[source]
        source: tokio::task::JoinError,
    },
}

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        match err {
            SqliteDaoError::NickTaken { nick } => {
                StorageError::conflict(format!("nick `{nick}` is already registered"))
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
