//! Entity types shared between the storage backends and the service layer.

use serde::{Deserialize, Serialize};

/// Durable representation of a registered player.
///
/// The raw password is never stored; `pass_hash` holds the salted argon2
/// verifier in PHC string form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier assigned by the database.
    pub id: i64,
    /// Unique display name (1-32 bytes, case-sensitive, immutable).
    pub nick: String,
    /// Salted password verifier (argon2 PHC string).
    pub pass_hash: String,
    /// Lifetime match wins. Monotonically non-decreasing.
    pub wins: u32,
    /// Lifetime match losses. Monotonically non-decreasing.
    pub losses: u32,
}
