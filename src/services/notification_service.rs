use chat::ChatClient;

use crate::config::Config;
use crate::errors::{DigestError, DigestResult};
use crate::services::summarizer::truncate_chars;

/// Marker appended when a message had to be cut to fit the chat API
const TRUNCATION_MARKER: &str = "\n…(truncated)";

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Post an already-rendered message; success means the chat API accepted it
    fn notify(&self, message: &str, channel: &str) -> DigestResult<()>;
}

pub struct SlackNotifier {
    client: ChatClient,
}

impl SlackNotifier {
    pub fn new(config: &Config) -> DigestResult<Self> {
        let client = ChatClient::new(&config.slack_api_url, &config.slack_token)?;
        Ok(Self { client })
    }
}

impl Notifier for SlackNotifier {
    fn notify(&self, message: &str, channel: &str) -> DigestResult<()> {
        let message = fit_message(message, chat::MAX_MESSAGE_CHARS);

        let posted = self
            .client
            .post_message(channel, &message)
            .map_err(|e| DigestError::Notify(format!("posting to {}: {}", channel, e)))?;

        tracing::debug!(channel = %posted.channel, ts = %posted.ts, "message posted");
        Ok(())
    }
}

/// Cut `message` to at most `max_chars` characters, marking the cut
fn fit_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }

    let keep = max_chars.saturating_sub(TRUNCATION_MARKER.chars().count());
    let mut truncated = truncate_chars(message, keep);
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
