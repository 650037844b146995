use url::Url;

use crate::domain::{Item, ProcessedIndex};

/// Canonical dedup key: the item's GUID when present, else its link, normalized
pub fn generate_key(item: &Item) -> String {
    normalize_url(item.identity())
}

/// Collapse URLs that differ only by scheme, `www.`, query, fragment,
/// trailing slash or letter case. Non-URLs come back trimmed.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();

    let parsed = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => return trimmed.to_string(),
    };

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return trimmed.to_string(),
    };
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    let scheme = match parsed.scheme() {
        "http" => "https",
        other => other,
    };

    let port = match parsed.port() {
        Some(port) if !(scheme == "https" && port == 443) => format!(":{}", port),
        _ => String::new(),
    };

    let path = parsed.path();
    let path = if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    };

    format!("{}://{}{}{}", scheme, host, port, path.to_lowercase())
}

/// Pure lookup against a snapshot the caller already loaded
pub fn is_processed(key: &str, index: &ProcessedIndex) -> bool {
    index.contains_key(key)
}
