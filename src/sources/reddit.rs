use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::domain::{FeedInfo, Item, Source, StrategyConfig};
use crate::errors::{DigestError, DigestResult, ResultExt};
use crate::sources::dates::{parse_with_formats, DateFormat};
use crate::sources::fetcher::Fetcher;
use crate::sources::traits::FeedStrategy;
use crate::sources::xml::{read_entries, XmlEntry};

pub const DEFAULT_FEED_URL: &str = "https://www.reddit.com/r/programming/.rss";

const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Rfc3339,
    DateFormat::WithOffset("%Y-%m-%dT%H:%M:%S%.f%:z"),
    DateFormat::Rfc2822,
];

pub fn default_config() -> StrategyConfig {
    // Reddit throttles generic user agents hard
    StrategyConfig::new("Reddit", DEFAULT_FEED_URL)
        .with_header("User-Agent", "linux:feed-digest:v0.1 (by /u/feed-digest)")
        .with_header("Accept", "application/atom+xml, application/xml")
}

fn external_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<a\s+href="([^"]+)"\s*>\s*\[link\]\s*</a>"#).expect("valid link regex")
    })
}

/// Subreddit listing served as Atom, with comments read from the JSON API
pub struct RedditStrategy {
    config: StrategyConfig,
}

impl RedditStrategy {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    /// Pull the submitted URL out of the `[link]` anchor Reddit embeds in `content`
    fn extract_external_link(content_html: &str) -> Option<String> {
        external_link_regex()
            .captures(content_html)
            .map(|caps| caps[1].replace("&amp;", "&"))
            .filter(|href| !href.trim().is_empty())
    }

    fn item_from_entry(entry: &XmlEntry) -> Option<Item> {
        let post_url = entry.attrs_of("link", "href").into_iter().next()?;
        let content = entry.text("content").unwrap_or_default();
        let link = Self::extract_external_link(&content).unwrap_or_else(|| post_url.clone());

        let title = entry.text("title").unwrap_or_else(|| "Untitled".to_string());
        let raw_date = entry
            .text("published")
            .or_else(|| entry.text("updated"))
            .unwrap_or_default();

        Some(
            Item::new(Source::Reddit, title, link)
                .with_guid(entry.text("id"))
                .with_description(content)
                .with_publish_date_raw(raw_date)
                .with_categories(entry.attrs_of("category", "term"))
                .with_comment_url(post_url),
        )
    }

    /// `https://www.reddit.com/r/x/comments/id/slug/` → `.../slug/.json?raw_json=1`
    fn comments_api_url(post_url: &str) -> DigestResult<String> {
        let mut url = Url::parse(post_url)
            .map_err(|e| DigestError::Fetch(format!("invalid post URL {}: {}", post_url, e)))?;

        let path = format!("{}/.json", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_query(Some("raw_json=1"));
        url.set_fragment(None);

        Ok(url.to_string())
    }

    /// Flatten the post and its comment tree into one text blob
    fn combine_comments(body: &[u8]) -> DigestResult<String> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DigestError::Parse(format!("comment JSON: {}", e)))?;

        let listings = value
            .as_array()
            .filter(|l| l.len() >= 2)
            .ok_or_else(|| DigestError::Parse("comment JSON is not a [post, comments] pair".to_string()))?;

        let mut lines = Vec::new();

        if let Some(post) = listings[0]["data"]["children"]
            .as_array()
            .and_then(|children| children.first())
        {
            let data = &post["data"];
            if let Some(title) = data["title"].as_str() {
                lines.push(format!("Title: {}", title));
            }
            if let Some(selftext) = data["selftext"].as_str().filter(|s| !s.trim().is_empty()) {
                lines.push(selftext.trim().to_string());
            }
        }

        lines.push("Comments:".to_string());
        Self::flatten_listing(&listings[1], 0, &mut lines);

        Ok(lines.join("\n"))
    }

    fn flatten_listing(listing: &Value, depth: usize, lines: &mut Vec<String>) {
        let Some(children) = listing["data"]["children"].as_array() else {
            return;
        };

        for child in children {
            // "more" stubs and anything that is not a comment carry no text
            if child["kind"].as_str() != Some("t1") {
                continue;
            }

            let data = &child["data"];
            let body = data["body"].as_str().unwrap_or_default().trim();
            if !body.is_empty() && body != "[deleted]" && body != "[removed]" {
                let author = data["author"].as_str().unwrap_or("[deleted]");
                lines.push(format!(
                    "{}- {}: {}",
                    "  ".repeat(depth),
                    author,
                    body.replace('\n', " ")
                ));
            }

            if data["replies"].is_object() {
                Self::flatten_listing(&data["replies"], depth + 1, lines);
            }
        }
    }
}

impl Default for RedditStrategy {
    fn default() -> Self {
        Self::new(default_config())
    }
}

impl FeedStrategy for RedditStrategy {
    fn source(&self) -> Source {
        Source::Reddit
    }

    fn config(&self) -> FeedInfo {
        FeedInfo {
            display_name: self.config.display_name.clone(),
            url: self.config.feed_url.clone(),
        }
    }

    fn request_headers(&self) -> BTreeMap<String, String> {
        self.config.request_headers.clone()
    }

    fn parse_feed(&self, bytes: &[u8]) -> DigestResult<Vec<Item>> {
        let entries = read_entries(bytes, "feed", "entry")?;

        Ok(entries.iter().filter_map(Self::item_from_entry).collect())
    }

    fn parse_date(&self, raw: &str) -> DigestResult<DateTime<Utc>> {
        parse_with_formats(raw, DATE_FORMATS)
    }

    fn fetch_comments(&self, fetcher: &dyn Fetcher, post_url: &str) -> DigestResult<String> {
        let api_url = Self::comments_api_url(post_url)?;

        let mut headers = self.config.request_headers.clone();
        headers.insert("Accept".to_string(), "application/json".to_string());

        let body = fetcher
            .fetch_bytes(&api_url, &headers)
            .with_context(|| format!("fetching comments from {}", api_url))?;

        let combined = Self::combine_comments(&body)?;
        tracing::debug!(post_url, chars = combined.len(), "combined reddit comments");
        Ok(combined)
    }
}
