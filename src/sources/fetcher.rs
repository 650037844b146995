use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::errors::{DigestError, DigestResult};

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Raw byte fetch used for feed documents and comment APIs
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync {
    fn fetch_bytes(&self, url: &str, headers: &BTreeMap<String, String>) -> DigestResult<Vec<u8>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> DigestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }

    fn header_map(headers: &BTreeMap<String, String>) -> DigestResult<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| DigestError::Fetch(format!("invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| DigestError::Fetch(format!("invalid header value for {}: {}", name, e)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_bytes(&self, url: &str, headers: &BTreeMap<String, String>) -> DigestResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .headers(Self::header_map(headers)?)
            .send()
            .map_err(|e| DigestError::Fetch(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Fetch(format!("GET {}: HTTP {}", url, status)));
        }

        let bytes = response
            .bytes()
            .map_err(|e| DigestError::Fetch(format!("reading body of {}: {}", url, e)))?;

        tracing::debug!(url, bytes = bytes.len(), "fetched document");
        Ok(bytes.to_vec())
    }
}
