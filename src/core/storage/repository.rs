use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use super::models::{AlertState, FeedState};
use super::{StateStore, StorageError};
use crate::core::feed::Fingerprint;

#[derive(Debug, Clone, FromRow)]
struct FeedStateRow {
    fingerprint: Option<String>,
    alert_state: i64,
    alert_time: i64,
    message: String,
}

/// SQLite-backed state, one row per feed key.
#[derive(Debug, Clone)]
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    /// Opens (creating if needed) the database file at `path`, taken verbatim.
    pub async fn open(path: &Path) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::connect_with(options).await
    }

    async fn connect_with(options: SqliteConnectOptions) -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn load(&self, feed_key: &str) -> Result<FeedState, StorageError> {
        let row = sqlx::query_as::<_, FeedStateRow>(
            r#"
            SELECT fingerprint, alert_state, alert_time, message
            FROM feed_states
            WHERE feed_key = ?1
            "#,
        )
        .bind(feed_key)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!(key = feed_key, "no stored state");
            return Ok(FeedState::default());
        };
        let alert_state = AlertState::try_from(row.alert_state)
            .map_err(|error| StorageError::corrupt(feed_key, error))?;
        Ok(FeedState {
            fingerprint: row.fingerprint.map(Fingerprint::from),
            alert_state,
            alert_time: row.alert_time,
            message: row.message,
        })
    }

    async fn save(&self, feed_key: &str, state: &FeedState) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO feed_states (feed_key, fingerprint, alert_state, alert_time, message)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(feed_key) DO UPDATE SET
              fingerprint = excluded.fingerprint,
              alert_state = excluded.alert_state,
              alert_time = excluded.alert_time,
              message = excluded.message,
              updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(feed_key)
        .bind(state.fingerprint.as_ref().map(Fingerprint::as_hex))
        .bind(i64::from(state.alert_state.code()))
        .bind(state.alert_time)
        .bind(&state.message)
        .execute(&self.pool)
        .await?;
        debug!(key = feed_key, "stored state");
        Ok(())
    }
}
