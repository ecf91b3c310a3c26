//! SQLite-backed [`PlayerStore`] implementation.
//!
//! rusqlite is a synchronous driver, so every query runs on the blocking
//! thread pool via `spawn_blocking`, with the connection behind a mutex.
//! All statements bind parameters; caller input never reaches SQL text.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use tracing::warn;

use crate::dao::{
    models::PlayerEntity,
    player_store::PlayerStore,
    storage::{StorageError, StorageResult},
};

use super::{
    config::{SqliteConfig, SqliteTarget},
    error::{SqliteDaoError, SqliteResult},
};

/// Schema of the player table. `IF NOT EXISTS` keeps initialization
/// idempotent across restarts.
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY,
    nick TEXT NOT NULL UNIQUE,
    pass_hash TEXT NOT NULL,
    wins INTEGER NOT NULL DEFAULT 0,
    losses INTEGER NOT NULL DEFAULT 0
)";

/// Player credential store backed by a single SQLite database.
#[derive(Clone)]
pub struct SqlitePlayerStore {
    conn: Arc<Mutex<Connection>>,
    config: SqliteConfig,
}

impl SqlitePlayerStore {
    /// Open (creating if necessary) the database and ensure the schema
    /// exists. Blocking; see [`connect`](Self::connect) for async contexts.
    pub fn open(config: SqliteConfig) -> SqliteResult<Self> {
        let conn = open_connection(&config)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    /// Open the database from an async context.
    pub async fn connect(config: SqliteConfig) -> StorageResult<Arc<dyn PlayerStore>> {
        let store = tokio::task::spawn_blocking(move || Self::open(config))
            .await
            .map_err(|source| SqliteDaoError::Task { source })??;
        Ok(Arc::new(store))
    }

    /// Run a closure against the connection on the blocking pool.
    async fn run<T, F>(&self, f: F) -> SqliteResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> SqliteResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&guard)
        })
        .await
        .map_err(|source| SqliteDaoError::Task { source })?
    }

    async fn find_by_nick_inner(&self, nick: String) -> SqliteResult<Option<PlayerEntity>> {
        self.run(move |conn| {
            conn.query_row(
                "SELECT id, nick, pass_hash, wins, losses FROM players WHERE nick = ?1",
                params![nick],
                map_player_row,
            )
            .optional()
            .map_err(|source| SqliteDaoError::Query {
                operation: "find_by_nick",
                source,
            })
        })
        .await
    }

    async fn create_player_inner(
        &self,
        nick: String,
        pass_hash: String,
    ) -> SqliteResult<PlayerEntity> {
        self.run(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO players (nick, pass_hash, wins, losses) VALUES (?1, ?2, 0, 0)",
                params![nick, pass_hash],
            );

            match inserted {
                Ok(_) => Ok(PlayerEntity {
                    id: conn.last_insert_rowid(),
                    nick,
                    pass_hash,
                    wins: 0,
                    losses: 0,
                }),
                Err(source) if is_constraint_violation(&source) => {
                    Err(SqliteDaoError::NickTaken { nick })
                }
                Err(source) => Err(SqliteDaoError::Query {
                    operation: "create_player",
                    source,
                }),
            }
        })
        .await
    }

    async fn record_match_result_inner(&self, player_id: i64, won: bool) -> SqliteResult<()> {
        self.run(move |conn| {
            let statement = if won {
                "UPDATE players SET wins = wins + 1 WHERE id = ?1"
            } else {
                "UPDATE players SET losses = losses + 1 WHERE id = ?1"
            };

            let changed =
                conn.execute(statement, params![player_id])
                    .map_err(|source| SqliteDaoError::Query {
                        operation: "record_match_result",
                        source,
                    })?;

            if changed == 0 {
                warn!(player_id, "match result for unknown player id dropped");
            }
            Ok(())
        })
        .await
    }

    async fn health_check_inner(&self) -> SqliteResult<()> {
        self.run(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))
                .map_err(|source| SqliteDaoError::Query {
                    operation: "health_check",
                    source,
                })
        })
        .await
    }

    async fn try_reconnect_inner(&self) -> SqliteResult<()> {
        // Reopening an in-memory database would silently discard its
        // contents, so only file-backed stores replace the connection.
        if matches!(self.config.target, SqliteTarget::Memory) {
            return self.health_check_inner().await;
        }

        let conn = Arc::clone(&self.conn);
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || {
            let fresh = open_connection(&config)?;
            let mut guard = conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = fresh;
            Ok(())
        })
        .await
        .map_err(|source| SqliteDaoError::Task { source })?
    }
}

impl PlayerStore for SqlitePlayerStore {
    fn find_by_nick(&self, nick: String) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_by_nick_inner(nick).await.map_err(Into::into) })
    }

    fn create_player(
        &self,
        nick: String,
        pass_hash: String,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .create_player_inner(nick, pass_hash)
                .await
                .map_err(Into::into)
        })
    }

    fn record_match_result(
        &self,
        player_id: i64,
        won: bool,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .record_match_result_inner(player_id, won)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.health_check_inner().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.try_reconnect_inner().await.map_err(Into::into) })
    }
}

/// Open a connection for the configured target and run schema setup.
fn open_connection(config: &SqliteConfig) -> SqliteResult<Connection> {
    let conn = match &config.target {
        SqliteTarget::File(path) => {
            Connection::open(path).map_err(|source| SqliteDaoError::Open {
                path: path.clone(),
                source,
            })?
        }
        SqliteTarget::Memory => {
            Connection::open_in_memory().map_err(|source| SqliteDaoError::Open {
                path: ":memory:".into(),
                source,
            })?
        }
    };

    conn.busy_timeout(config.busy_timeout)
        .map_err(|source| SqliteDaoError::Query {
            operation: "busy_timeout",
            source,
        })?;

    conn.execute(SCHEMA, [])
        .map_err(|source| SqliteDaoError::Query {
            operation: "initialize_schema",
            source,
        })?;

    Ok(conn)
}

/// Map a `players` row into the shared entity type.
fn map_player_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlayerEntity> {
    Ok(PlayerEntity {
        id: row.get(0)?,
        nick: row.get(1)?,
        pass_hash: row.get(2)?,
        wins: row.get(3)?,
        losses: row.get(4)?,
    })
}

/// True when the driver error is a uniqueness/constraint rejection.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
    )
}
