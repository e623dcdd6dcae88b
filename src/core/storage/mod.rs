pub mod file_store;
pub mod models;
pub mod repository;

use async_trait::async_trait;

pub use file_store::FileStateStore;
pub use models::{AlertState, FeedState};
pub use repository::SqliteStateStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("state io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt state for {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("state encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    pub fn corrupt(key: &str, reason: impl ToString) -> Self {
        Self::Corrupt {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Durable per-feed record of the last observation.
///
/// `load` yields `FeedState::default()` for a key that was never saved and
/// fails only on unreadable or corrupt data. `save` replaces the whole record
/// and must never expose a partial write.
#[async_trait]
pub trait StateStore {
    async fn load(&self, feed_key: &str) -> Result<FeedState, StorageError>;
    async fn save(&self, feed_key: &str, state: &FeedState) -> Result<(), StorageError>;
}

/// Derives the storage key of a feed: every non-alphanumeric character becomes `_`.
pub fn feed_key(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
