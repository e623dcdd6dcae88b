use feed_rs::model::Entry;
use serde::Deserialize;

use super::types::ParsedEntry;

const UNTITLED_ENTRY: &str = "No title";

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("xml feed parse error: {0}")]
    Xml(#[from] feed_rs::parser::ParseFeedError),
    #[error("json feed parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct JsonFeed {
    #[serde(default)]
    items: Vec<JsonFeedItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonFeedItem {
    id: Option<String>,
    title: Option<String>,
    date_published: Option<String>,
    date_modified: Option<String>,
}

/// Parses a feed payload into its entries, newest first as the feed lists them.
pub fn parse_feed_bytes(raw: &[u8]) -> Result<Vec<ParsedEntry>, FeedParseError> {
    let trimmed = trim_leading_ascii_whitespace(raw);
    if trimmed.is_empty() {
        return Err(FeedParseError::EmptyPayload);
    }
    if trimmed[0] == b'{' {
        return parse_json_feed(trimmed);
    }
    parse_xml_feed(trimmed)
}

fn parse_xml_feed(raw: &[u8]) -> Result<Vec<ParsedEntry>, FeedParseError> {
    // feed-rs invents ids for entries without one; those must stay empty
    let feed = feed_rs::parser::Builder::new()
        .id_generator(|_, _, _| String::new())
        .build()
        .parse(raw)?;
    Ok(feed.entries.iter().map(entry_from_xml).collect())
}

fn parse_json_feed(raw: &[u8]) -> Result<Vec<ParsedEntry>, FeedParseError> {
    let feed: JsonFeed = serde_json::from_slice(raw)?;
    let entries = feed
        .items
        .into_iter()
        .map(|item| ParsedEntry {
            id: item.id.unwrap_or_default(),
            updated: item
                .date_modified
                .or(item.date_published)
                .unwrap_or_default(),
            title: item.title.unwrap_or_else(|| UNTITLED_ENTRY.to_string()),
        })
        .collect();
    Ok(entries)
}

// XML timestamps arrive parsed, so `updated` is their UTC RFC 3339 rendering.
fn entry_from_xml(entry: &Entry) -> ParsedEntry {
    let title = entry
        .title
        .as_ref()
        .map(|text| text.content.clone())
        .unwrap_or_else(|| UNTITLED_ENTRY.to_string());
    let updated = entry
        .updated
        .or(entry.published)
        .map(|timestamp| timestamp.to_rfc3339())
        .unwrap_or_default();

    ParsedEntry {
        id: entry.id.clone(),
        updated,
        title,
    }
}

fn trim_leading_ascii_whitespace(raw: &[u8]) -> &[u8] {
    let mut index = 0;
    while index < raw.len() && raw[index].is_ascii_whitespace() {
        index += 1;
    }
    &raw[index..]
}
