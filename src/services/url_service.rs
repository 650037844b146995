use crate::domain::Notification;
use crate::errors::{DigestResult, ResultExt};
use crate::services::notification_service::Notifier;
use crate::services::summarizer::Summarizer;

/// Summarizes a single URL on request and posts the result.
///
/// Nothing is recorded in the processed index; asking twice summarizes twice.
pub struct UrlService {
    summarizer: Box<dyn Summarizer>,
    notifier: Box<dyn Notifier>,
}

impl UrlService {
    pub fn new(summarizer: Box<dyn Summarizer>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            summarizer,
            notifier,
        }
    }

    /// Returns the summary that was posted
    pub fn process(&self, url: &str, channel: &str) -> DigestResult<String> {
        let url = url.trim();
        tracing::info!(url, channel, "summarizing on request");

        let summary = self
            .summarizer
            .summarize_url(url)
            .with_context(|| format!("summarizing {}", url))?;

        let notification = Notification::on_demand(url, summary.clone());
        self.notifier
            .notify(&notification.format(), channel)
            .with_context(|| format!("posting summary of {}", url))?;

        Ok(summary)
    }
}
