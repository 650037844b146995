use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{FeedInfo, Item, Source, StrategyConfig};
use crate::errors::DigestResult;
use crate::sources::dates::{parse_with_formats, DateFormat};
use crate::sources::traits::{drop_category, FeedStrategy, ASK_CATEGORY};
use crate::sources::xml::{read_entries, XmlEntry};

pub const DEFAULT_FEED_URL: &str = "https://b.hatena.ne.jp/hotentry/it.rss";

const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Rfc3339,
    DateFormat::WithOffset("%Y-%m-%dT%H:%M:%S%z"),
    DateFormat::Naive("%Y-%m-%dT%H:%M:%S"),
    DateFormat::Rfc2822,
];

pub fn default_config() -> StrategyConfig {
    StrategyConfig::new("Hatena Bookmark", DEFAULT_FEED_URL)
        .with_header("User-Agent", "Mozilla/5.0 (compatible; feed-digest/0.1)")
        .with_header("Accept", "application/rdf+xml, application/rss+xml, application/xml")
}

/// Hatena Bookmark hot entries, served as RSS 1.0 (RDF)
pub struct HatenaStrategy {
    config: StrategyConfig,
}

impl HatenaStrategy {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    fn item_from_entry(entry: &XmlEntry) -> Option<Item> {
        let link = entry
            .text("link")
            .or_else(|| entry.attrs.get("rdf:about").cloned())?;

        let title = entry.text("title").unwrap_or_else(|| "Untitled".to_string());

        Some(
            Item::new(Source::Hatena, title, link)
                .with_description(entry.text("description").unwrap_or_default())
                .with_publish_date_raw(entry.text("dc:date").unwrap_or_default())
                .with_categories(entry.texts("dc:subject")),
        )
    }
}

impl Default for HatenaStrategy {
    fn default() -> Self {
        Self::new(default_config())
    }
}

impl FeedStrategy for HatenaStrategy {
    fn source(&self) -> Source {
        Source::Hatena
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
        let entries = read_entries(bytes, "rdf:RDF", "item")?;

        let items = entries
            .iter()
            .filter_map(|entry| {
                let item = Self::item_from_entry(entry);
                if item.is_none() {
                    tracing::debug!(source = "hatena", "skipping item without link");
                }
                item
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

    // Trimmed from the hotentry/it feed
    const SAMPLE_RDF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF
  xmlns="http://purl.org/rss/1.0/"
  xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
  xmlns:content="http://purl.org/rss/1.0/modules/content/"
  xmlns:dc="http://purl.org/dc/elements/1.1/"
  xmlns:hatena="http://www.hatena.ne.jp/info/xmlns#">
  <channel rdf:about="https://b.hatena.ne.jp/hotentry/it">
    <title>はてなブックマーク - 人気エントリー - テクノロジー</title>
    <link>https://b.hatena.ne.jp/hotentry/it</link>
    <items>
      <rdf:Seq>
        <rdf:li rdf:resource="https://zenn.dev/example/articles/rust-async" />
        <rdf:li rdf:resource="https://anond.hatelabo.jp/20240115120000" />
      </rdf:Seq>
    </items>
  </channel>
  <item rdf:about="https://zenn.dev/example/articles/rust-async">
    <title>Rustの非同期処理を理解する</title>
    <link>https://zenn.dev/example/articles/rust-async</link>
    <description>tokioを使った非同期処理の基本</description>
    <dc:date>2024-01-15T21:00:00+09:00</dc:date>
    <dc:subject>テクノロジー</dc:subject>
    <dc:subject>プログラミング</dc:subject>
    <hatena:bookmarkcount>321</hatena:bookmarkcount>
  </item>
  <item rdf:about="https://anond.hatelabo.jp/20240115120000">
    <title>エンジニアに質問です</title>
    <link>https://anond.hatelabo.jp/20240115120000</link>
    <description>教えてください</description>
    <dc:date>2024-01-15T12:00:00+09:00</dc:date>
    <dc:subject>Ask</dc:subject>
  </item>
</rdf:RDF>"#;

    #[test]
    fn test_parse_feed_reads_rdf_items() {
        let strategy = HatenaStrategy::default();
        let items = strategy.parse_feed(SAMPLE_RDF.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        let first = &items[0];
        assert_eq!(first.title, "Rustの非同期処理を理解する");
        assert_eq!(first.link, "https://zenn.dev/example/articles/rust-async");
        assert_eq!(first.description, "tokioを使った非同期処理の基本");
        assert_eq!(first.publish_date_raw, "2024-01-15T21:00:00+09:00");
        assert_eq!(first.categories, vec!["テクノロジー", "プログラミング"]);
        assert_eq!(first.source, Source::Hatena);
        assert!(first.guid.is_none());
        assert!(first.comment_url.is_empty());
    }

    #[test]
    fn test_link_falls_back_to_rdf_about() {
        let xml = br#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <item rdf:about="https://example.com/only-about"><title>T</title></item>
  <item><title>No link at all</title></item>
</rdf:RDF>"#;

        let items = HatenaStrategy::default().parse_feed(xml).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://example.com/only-about");
    }

    #[test]
    fn test_parse_feed_rejects_rss2() {
        let xml = b"<rss version=\"2.0\"><channel></channel></rss>";
        assert!(matches!(
            HatenaStrategy::default().parse_feed(xml),
            Err(DigestError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_date() {
        let strategy = HatenaStrategy::default();
        assert_eq!(
            strategy.parse_date("2024-01-15T21:00:00+09:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            strategy.parse_date("2024-01-15T12:00:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
        );
        assert!(strategy.parse_date("15/01/2024").is_err());
    }

    #[test]
    fn test_filter_drops_ask_items() {
        let strategy = HatenaStrategy::default();
        let items = strategy.parse_feed(SAMPLE_RDF.as_bytes()).unwrap();

        let filtered = strategy.filter_items(items);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Rustの非同期処理を理解する");
    }

    #[test]
    fn test_fetch_comments_is_unsupported() {
        let fetcher = MockFetcher::new();
        let result = HatenaStrategy::default().fetch_comments(&fetcher, "https://example.com");
        assert!(matches!(result, Err(DigestError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_config_and_headers() {
        let strategy = HatenaStrategy::default();
        assert_eq!(strategy.config().url, DEFAULT_FEED_URL);
        assert_eq!(strategy.config().display_name, "Hatena Bookmark");
        assert!(strategy.request_headers().contains_key("User-Agent"));
    }
}
