use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{FeedInfo, Item, Source};
use crate::errors::{DigestError, DigestResult};
use crate::sources::fetcher::Fetcher;

/// Category that marks "ask" threads, which carry no article to summarize
pub const ASK_CATEGORY: &str = "ask";

pub trait FeedStrategy: Send + Sync {
    /// Identifies the source this strategy reads
    fn source(&self) -> Source;

    /// Display name and feed URL
    fn config(&self) -> FeedInfo;

    /// Headers sent with every request for this source
    fn request_headers(&self) -> BTreeMap<String, String>;

    /// Parse the source's native document format into items
    fn parse_feed(&self, bytes: &[u8]) -> DigestResult<Vec<Item>>;

    /// Parse a raw date string using the source's known formats
    fn parse_date(&self, raw: &str) -> DigestResult<DateTime<Utc>>;

    /// Drop items the source does not want processed, keeping order
    fn filter_items(&self, items: Vec<Item>) -> Vec<Item> {
        items
    }

    /// Fetch the discussion for a post and combine it into one text blob
    fn fetch_comments(&self, _fetcher: &dyn Fetcher, post_url: &str) -> DigestResult<String> {
        Err(DigestError::UnsupportedOperation(format!(
            "comment summarization for {} is not yet implemented ({})",
            self.source(),
            post_url
        )))
    }
}

/// Remove items tagged with `category`, compared case-insensitively
pub fn drop_category(items: Vec<Item>, category: &str) -> Vec<Item> {
    items
        .into_iter()
        .filter(|item| !item.has_category(category))
        .collect()
}
