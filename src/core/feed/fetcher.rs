use async_trait::async_trait;
use tracing::debug;

use super::parser::{parse_feed_bytes, FeedParseError};
use super::types::{FeedTarget, LatestEntry};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error(transparent)]
    Parse(#[from] FeedParseError),
    #[error("feed has no entries")]
    EmptyFeed,
}

/// Supplies the most recent entry of a feed. One call is one fetch attempt.
#[async_trait]
pub trait EntrySource {
    async fn latest_entry(&self, target: &FeedTarget) -> Result<LatestEntry, FetchError>;
}

pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    Ok(response.bytes().await?.to_vec())
}

/// Fetches over HTTP with a shared client; the client's timeout bounds each feed.
#[derive(Debug, Clone)]
pub struct HttpEntrySource {
    client: reqwest::Client,
}

impl HttpEntrySource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntrySource for HttpEntrySource {
    async fn latest_entry(&self, target: &FeedTarget) -> Result<LatestEntry, FetchError> {
        let body = fetch_feed(&self.client, &target.url).await?;
        debug!(feed = %target.name, bytes = body.len(), "fetched feed");
        let entries = parse_feed_bytes(&body)?;
        entries.into_iter().next().ok_or(FetchError::EmptyFeed)
    }
}
