//! SQLite backend for the player store.

mod config;
mod error;
mod store;

pub use config::{SqliteConfig, SqliteTarget};
pub use error::{SqliteDaoError, SqliteResult};
pub use store::SqlitePlayerStore;
