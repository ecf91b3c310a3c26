//! Persistence layer: entities, the storage error surface, and the player
//! store backends.

/// Database model definitions.
pub mod models;
/// Player credential storage and retrieval operations.
pub mod player_store;
/// Storage abstraction layer for database operations.
pub mod storage;
