//! Abstraction over the persistence layer for player credentials and stats.

pub mod sqlite;

use futures::future::BoxFuture;

use crate::dao::models::PlayerEntity;
use crate::dao::storage::StorageResult;

/// Durable store of [`PlayerEntity`] rows keyed by nick.
///
/// Object-safe so the application can hold an `Arc<dyn PlayerStore>` and swap
/// backends (or a test double) without touching the service layer.
pub trait PlayerStore: Send + Sync {
    /// Look up a player by exact, case-sensitive nick.
    fn find_by_nick(&self, nick: String) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Insert a new player with zeroed stats. Fails with a conflict when the
    /// nick is already taken.
    fn create_player(
        &self,
        nick: String,
        pass_hash: String,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>>;
    /// Atomically increment the win or loss counter of a player.
    fn record_match_result(
        &self,
        player_id: i64,
        won: bool,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish the backend connection after a failed probe.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
