use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{FeedInfo, Item, Source, StrategyConfig};
use crate::errors::DigestResult;
use crate::sources::dates::{parse_with_formats, DateFormat};
use crate::sources::traits::{drop_category, FeedStrategy, ASK_CATEGORY};
use crate::sources::xml::read_entries;

pub const DEFAULT_FEED_URL: &str = "https://lobste.rs/rss";

const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Rfc2822,
    DateFormat::Rfc3339,
    DateFormat::WithOffset("%a, %d %b %Y %H:%M:%S %z"),
];

pub fn default_config() -> StrategyConfig {
    StrategyConfig::new("Lobsters", DEFAULT_FEED_URL)
        .with_header("User-Agent", "Mozilla/5.0 (compatible; feed-digest/0.1)")
        .with_header("Accept", "application/rss+xml, application/xml")
}

/// Lobsters front page, served as RSS 2.0
pub struct LobstersStrategy {
    config: StrategyConfig,
}

impl LobstersStrategy {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }
}

impl Default for LobstersStrategy {
    fn default() -> Self {
        Self::new(default_config())
    }
}

impl FeedStrategy for LobstersStrategy {
    fn source(&self) -> Source {
        Source::Lobsters
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
        let entries = read_entries(bytes, "rss", "item")?;

        let items = entries
            .into_iter()
            .filter_map(|entry| {
                let link = entry.text("link")?;
                let title = entry.text("title").unwrap_or_else(|| "Untitled".to_string());

                // Story pages are not summarized, so no comment URL is carried
                Some(
                    Item::new(Source::Lobsters, title, link)
                        .with_guid(entry.text("guid"))
                        .with_description(entry.text("description").unwrap_or_default())
                        .with_publish_date_raw(entry.text("pubDate").unwrap_or_default())
                        .with_categories(entry.texts("category")),
                )
            })
            .collect();

        Ok(items)
    }

    fn parse_date(&self, raw: &str) -> DigestResult<DateTime<Utc>> {
        parse_with_formats(raw, DATE_FORMATS)
    }

    fn filter_items(&self, items: Vec<Item>) -> Vec<Item> {
        drop_category(items, ASK_CATEGORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DigestError;
    use crate::sources::MockFetcher;
    use chrono::TimeZone;

    const SAMPLE_RSS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>Lobsters</title>
    <link>https://lobste.rs/</link>
    <description></description>
    <item>
      <title>Writing a linker in Rust</title>
      <link>https://example.org/blog/linker</link>
      <guid isPermaLink="false">https://lobste.rs/s/abc123</guid>
      <author>alice@users.lobste.rs (alice)</author>
      <pubDate>Mon, 15 Jan 2024 06:00:00 -0600</pubDate>
      <comments>https://lobste.rs/s/abc123/writing_linker_rust</comments>
      <description>&lt;p&gt;Submitted by alice&lt;/p&gt;</description>
      <category>rust</category>
      <category>compilers</category>
    </item>
    <item>
      <title>Ask Lobsters: what are you reading?</title>
      <link>https://lobste.rs/s/def456/ask_lobsters</link>
      <guid isPermaLink="false">https://lobste.rs/s/def456</guid>
      <pubDate>Tue, 16 Jan 2024 08:00:00 +0000</pubDate>
      <category>ask</category>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed_reads_rss_items() {
        let items = LobstersStrategy::default().parse_feed(SAMPLE_RSS).unwrap();

        assert_eq!(items.len(), 2);
        let first = &items[0];
        assert_eq!(first.title, "Writing a linker in Rust");
        assert_eq!(first.link, "https://example.org/blog/linker");
        assert_eq!(first.guid.as_deref(), Some("https://lobste.rs/s/abc123"));
        assert_eq!(first.publish_date_raw, "Mon, 15 Jan 2024 06:00:00 -0600");
        assert_eq!(first.description, "<p>Submitted by alice</p>");
        assert_eq!(first.categories, vec!["rust", "compilers"]);
        assert!(first.comment_url.is_empty());
        assert!(!first.has_discussion());
    }

    #[test]
    fn test_parse_feed_rejects_atom() {
        let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom"><entry/></feed>"#;
        assert!(matches!(
            LobstersStrategy::default().parse_feed(xml),
            Err(DigestError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_date_rfc2822() {
        let strategy = LobstersStrategy::default();
        assert_eq!(
            strategy.parse_date("Mon, 15 Jan 2024 06:00:00 -0600").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
        );
        assert!(strategy.parse_date("").is_err());
    }

    #[test]
    fn test_filter_drops_ask_case_insensitive_any_match() {
        let strategy = LobstersStrategy::default();
        let make = |title: &str, categories: &[&str]| {
            Item::new(Source::Lobsters, title.to_string(), format!("https://e.com/{}", title))
                .with_categories(categories.iter().map(|c| c.to_string()).collect())
        };

        let items = vec![
            make("a", &["ask"]),
            make("b", &["Ask", "other"]),
            make("c", &["ASK"]),
            make("d", &["rust"]),
            make("e", &[]),
        ];

        let titles: Vec<String> = strategy
            .filter_items(items)
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["d", "e"]);
    }

    #[test]
    fn test_fetch_comments_is_unsupported() {
        let fetcher = MockFetcher::new();
        let result = LobstersStrategy::default().fetch_comments(&fetcher, "https://lobste.rs/s/abc123");
        assert!(matches!(result, Err(DigestError::UnsupportedOperation(_))));
    }
}
