/// The entry fields a check needs. `id` and `updated` are empty when the
/// feed omits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub id: String,
    pub updated: String,
    pub title: String,
}

/// The most recent entry of a feed, the only one a check looks at.
pub type LatestEntry = ParsedEntry;

/// One feed to monitor, as listed in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTarget {
    pub name: String,
    pub url: String,
}

impl FeedTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
