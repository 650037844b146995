use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Item;

/// Persisted record of an article that has been summarized and notified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub title: String,
    #[serde(rename = "url")]
    pub canonical_url: String,
    pub source: String,
    #[serde(rename = "pub_date", default)]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(rename = "processed_date")]
    pub processed_at: DateTime<Utc>,
}

impl IndexEntry {
    pub fn from_item(item: &Item, key: String, processed_at: DateTime<Utc>) -> Self {
        Self {
            title: item.title.clone(),
            canonical_url: key,
            source: item.source.to_string(),
            publish_date: item.publish_date,
            processed_at,
        }
    }
}

/// Canonical key → entry, serialized as one JSON object
pub type ProcessedIndex = BTreeMap<String, IndexEntry>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;
    use chrono::TimeZone;

    #[test]
    fn test_entry_json_shape() {
        let item = Item::new(
            Source::Reddit,
            "Post".to_string(),
            "https://example.com/post".to_string(),
        );
        let processed = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let entry = IndexEntry::from_item(&item, "https://example.com/post".to_string(), processed);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["url"], "https://example.com/post");
        assert_eq!(value["source"], "reddit");
        assert!(value["pub_date"].is_null());
        assert_eq!(value["processed_date"], "2024-01-15T12:00:00Z");
    }

    #[test]
    fn test_entry_without_pub_date_field_deserializes() {
        let entry: IndexEntry = serde_json::from_str(
            r#"{"title":"T","url":"https://a.com/x","source":"hatena","processed_date":"2024-02-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(entry.publish_date.is_none());
        assert_eq!(entry.source, "hatena");
    }
}
