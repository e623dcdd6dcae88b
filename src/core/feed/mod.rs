pub mod fetcher;
pub mod fingerprint;
pub mod parser;
pub mod types;

pub use fetcher::{EntrySource, FetchError, HttpEntrySource};
pub use fingerprint::{fingerprint, Fingerprint};
pub use types::{FeedTarget, LatestEntry};
