use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::core::feed::FeedTarget;
use crate::core::monitor::DEFAULT_ALERT_TTL;
use crate::core::storage::{feed_key, StorageError};

pub const DEFAULT_STATE_DIR: &str = "/var/lib/feedwatch";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
const SQLITE_FILE_NAME: &str = "feedwatch.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid feed list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid feed list: {0}")]
    Invalid(String),
    #[error("no feeds configured: pass --url or a feed list")]
    NoFeeds,
    #[error("state store unavailable: {0}")]
    State(#[from] StorageError),
    #[error("http client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StateBackend {
    /// One JSON file per feed
    #[default]
    File,
    /// A single SQLite database
    Sqlite,
}

/// Where the feeds to check come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSelection {
    Single(FeedTarget),
    List(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub feeds: Option<FeedSelection>,
    pub state_dir: PathBuf,
    pub state_backend: StateBackend,
    pub timeout: Duration,
    pub alert_ttl_secs: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feeds: None,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            state_backend: StateBackend::File,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            alert_ttl_secs: DEFAULT_ALERT_TTL,
        }
    }
}

impl Settings {
    pub fn sqlite_path(&self) -> PathBuf {
        self.state_dir.join(SQLITE_FILE_NAME)
    }

    pub fn resolve_targets(&self) -> Result<Vec<FeedTarget>, ConfigError> {
        match &self.feeds {
            Some(FeedSelection::Single(target)) => {
                let target = validate_target(target.name.clone(), target.url.clone())?;
                Ok(vec![target])
            }
            Some(FeedSelection::List(path)) => load_feed_list(path),
            None => Err(ConfigError::NoFeeds),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FeedListItem {
    Url(String),
    Object { url: String, name: Option<String> },
}

pub fn load_feed_list(path: &Path) -> Result<Vec<FeedTarget>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_feed_list(&raw)
}

/// Parses a JSON array of feed URLs or `{ "name", "url" }` objects, keeping order.
pub fn parse_feed_list(input: &str) -> Result<Vec<FeedTarget>, ConfigError> {
    let items: Vec<FeedListItem> = serde_json::from_str(input)?;
    if items.is_empty() {
        return Err(ConfigError::Invalid("list is empty".to_string()));
    }

    let mut targets = Vec::with_capacity(items.len());
    for item in items {
        let target = match item {
            FeedListItem::Url(url) => validate_target(url.clone(), url)?,
            FeedListItem::Object { url, name } => {
                let name = name
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| url.clone());
                validate_target(name, url)?
            }
        };
        targets.push(target);
    }
    warn_on_shared_keys(&targets);
    Ok(targets)
}

fn validate_target(name: String, url: String) -> Result<FeedTarget, ConfigError> {
    let url = url.trim().to_string();
    if url.is_empty() {
        return Err(ConfigError::Invalid(format!("feed {name:?} has no url")));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!("feed {name:?} has a non-http url: {url}")));
    }
    let name = name.trim().to_string();
    Ok(FeedTarget::new(if name.is_empty() { url.clone() } else { name }, url))
}

fn warn_on_shared_keys(targets: &[FeedTarget]) {
    let mut seen = HashMap::<String, &str>::new();
    for target in targets {
        if let Some(first) = seen.insert(feed_key(&target.name), &target.name) {
            warn!(
                first = first,
                second = %target.name,
                "feeds share a state key and will overwrite each other's state"
            );
        }
    }
}
