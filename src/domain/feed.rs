use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Hatena,
    Reddit,
    Lobsters,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Hatena, Source::Reddit, Source::Lobsters];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Hatena => "hatena",
            Source::Reddit => "reddit",
            Source::Lobsters => "lobsters",
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hatena" => Ok(Source::Hatena),
            "reddit" => Ok(Source::Reddit),
            "lobsters" => Ok(Source::Lobsters),
            _ => Err(format!("Unknown source: {}", s)),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static per-source feed settings, immutable once a strategy owns them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    pub display_name: String,
    pub feed_url: String,
    pub request_headers: BTreeMap<String, String>,
}

impl StrategyConfig {
    pub fn new(display_name: &str, feed_url: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            feed_url: feed_url.to_string(),
            request_headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.request_headers
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_feed_url(mut self, feed_url: Option<String>) -> Self {
        if let Some(url) = feed_url.filter(|u| !u.trim().is_empty()) {
            self.feed_url = url;
        }
        self
    }
}

/// Display name and URL as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedInfo {
    pub display_name: String,
    pub url: String,
}
