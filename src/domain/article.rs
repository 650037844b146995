use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Source;

/// One entry of a fetched feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub description: String,
    pub publish_date_raw: String,
    pub publish_date: Option<DateTime<Utc>>,
    pub guid: Option<String>,
    pub categories: Vec<String>,
    pub source: Source,
    pub comment_url: String,
}

impl Item {
    pub fn new(source: Source, title: String, link: String) -> Self {
        Self {
            title,
            link,
            description: String::new(),
            publish_date_raw: String::new(),
            publish_date: None,
            guid: None,
            categories: Vec::new(),
            source,
            comment_url: String::new(),
        }
    }

    /// Identifier used for intra-batch dedupe: GUID when present, else link
    pub fn identity(&self) -> &str {
        match self.guid.as_deref() {
            Some(guid) if !guid.trim().is_empty() => guid,
            _ => &self.link,
        }
    }

    /// True when the item points at a discussion page separate from its link
    pub fn has_discussion(&self) -> bool {
        !self.comment_url.is_empty() && self.comment_url != self.link
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(category))
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_publish_date_raw(mut self, raw: String) -> Self {
        self.publish_date_raw = raw;
        self
    }

    pub fn with_guid(mut self, guid: Option<String>) -> Self {
        self.guid = guid.filter(|g| !g.trim().is_empty());
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_comment_url(mut self, comment_url: String) -> Self {
        self.comment_url = comment_url;
        self
    }
}
