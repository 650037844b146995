//! Slack Web API bindings for Rust
//! Provides a blocking client that posts messages to channels by name or ID

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Slack rejects `chat.postMessage` text longer than this many characters
pub const MAX_MESSAGE_CHARS: usize = 40_000;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Slack API error: {0}")]
    Api(String),
    #[error("Invalid header value")]
    InvalidHeader,
}

#[derive(Debug, Serialize)]
struct PostMessagePayload<'a> {
    channel: &'a str,
    text: &'a str,
    mrkdwn: bool,
    unfurl_links: bool,
}

/// Envelope every Slack Web API method answers with
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}

impl ApiResponse {
    /// Turn an `"ok": false` envelope into an error
    pub fn into_result(self) -> Result<PostedMessage, ChatError> {
        if !self.ok {
            return Err(ChatError::Api(
                self.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        Ok(PostedMessage {
            channel: self.channel.unwrap_or_default(),
            ts: self.ts.unwrap_or_default(),
        })
    }
}

pub struct ChatClient {
    url: String,
    client: Client,
}

impl ChatClient {
    pub fn new(url: &str, token: &str) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ChatError::InvalidHeader)?,
        );
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.url
    }

    /// Post a message to a channel (name like `#feeds` or an ID like `C0123`)
    pub fn post_message(&self, channel: &str, text: &str) -> Result<PostedMessage, ChatError> {
        let payload = PostMessagePayload {
            channel,
            text,
            mrkdwn: true,
            unfurl_links: false,
        };

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.url))
            .json(&payload)
            .send()?
            .error_for_status()?;

        let envelope: ApiResponse = response.json()?;
        envelope.into_result()
    }
}

/// Create a new chat client
pub fn create_client(url: &str, token: &str) -> Result<ChatClient, ChatError> {
    ChatClient::new(url, token)
}

/// Post a message with a one-off client
pub fn post_message(
    url: &str,
    token: &str,
    channel: &str,
    text: &str,
) -> Result<PostedMessage, ChatError> {
    create_client(url, token)?.post_message(channel, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_becomes_posted_message() {
        let envelope: ApiResponse =
            serde_json::from_str(r#"{"ok":true,"channel":"C123","ts":"1700000000.000100"}"#)
                .unwrap();

        let posted = envelope.into_result().unwrap();
        assert_eq!(posted.channel, "C123");
        assert_eq!(posted.ts, "1700000000.000100");
    }

    #[test]
    fn test_not_ok_envelope_is_api_error() {
        let envelope: ApiResponse =
            serde_json::from_str(r#"{"ok":false,"error":"channel_not_found"}"#).unwrap();

        match envelope.into_result() {
            Err(ChatError::Api(msg)) => assert_eq!(msg, "channel_not_found"),
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_ok_without_error_field() {
        let envelope: ApiResponse = serde_json::from_str(r#"{"ok":false}"#).unwrap();
        assert!(matches!(envelope.into_result(), Err(ChatError::Api(m)) if m == "unknown_error"));
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ChatClient::new("https://slack.example/api/", "xoxb-test").unwrap();
        assert_eq!(client.base_url(), "https://slack.example/api");
    }

    #[test]
    fn test_invalid_token_header() {
        let result = ChatClient::new(DEFAULT_API_URL, "bad\ntoken");
        assert!(matches!(result, Err(ChatError::InvalidHeader)));
    }
}
