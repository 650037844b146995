use std::time::Duration;

use reqwest::blocking::Client;
use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{DigestError, DigestResult};

/// Longest page or comment text sent to the model, in characters
const MAX_INPUT_CHARS: usize = 20_000;

const SUMMARIZE_TIMEOUT_SECS: u64 = 120;

const PAGE_USER_AGENT: &str = "Mozilla/5.0 (compatible; feed-digest/0.1)";

#[cfg_attr(test, mockall::automock)]
pub trait Summarizer: Send + Sync {
    /// Summarize the page found at `url`
    fn summarize_url(&self, url: &str) -> DigestResult<String>;

    /// Summarize text the caller already has, such as a comment thread
    fn summarize_text(&self, text: &str) -> DigestResult<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    /// Short digest for scheduled feed runs
    Feed,
    /// Longer write-up for ad-hoc requests
    OnDemand,
}

impl SummaryMode {
    fn instructions(&self) -> &'static str {
        match self {
            SummaryMode::Feed => {
                "Summarize the following article in at most three short bullet points. \
                 Reply with the bullet points only."
            }
            SummaryMode::OnDemand => {
                "Write a thorough summary of the following article: a one-sentence overview, \
                 the key points as bullet points, and a short note on why it matters."
            }
        }
    }

    fn comment_instructions(&self) -> &'static str {
        "Summarize the main opinions in the following discussion thread in at most three \
         short bullet points. Mention notable disagreements."
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Summarizer backed by the Gemini `generateContent` API
pub struct GeminiSummarizer {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    mode: SummaryMode,
}

impl GeminiSummarizer {
    pub fn new(api_url: &str, api_key: &str, model: &str, mode: SummaryMode) -> DigestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SUMMARIZE_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            mode,
        })
    }

    pub fn from_config(config: &Config, mode: SummaryMode) -> DigestResult<Self> {
        Self::new(
            &config.gemini_api_url,
            &config.gemini_api_key,
            &config.gemini_model,
            mode,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }

    fn build_prompt(instructions: &str, body: &str) -> String {
        format!("{}\n\n---\n{}", instructions, truncate_chars(body, MAX_INPUT_CHARS))
    }

    /// Concatenated text of the first candidate
    fn extract_text(response: GenerateResponse) -> DigestResult<String> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(DigestError::Summarize("model returned no text".to_string()));
        }
        Ok(text.to_string())
    }

    fn generate(&self, prompt: &str) -> DigestResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| DigestError::Summarize(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DigestError::Summarize(format!(
                "HTTP {}: {}",
                status,
                truncate_chars(&body, 300)
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| DigestError::Summarize(format!("decoding response: {}", e)))?;

        Self::extract_text(parsed)
    }

    fn fetch_page_text(&self, url: &str) -> DigestResult<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, PAGE_USER_AGENT)
            .send()
            .map_err(|e| DigestError::Summarize(format!("fetching {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Summarize(format!("fetching {}: HTTP {}", url, status)));
        }

        let html = response
            .text()
            .map_err(|e| DigestError::Summarize(format!("reading {}: {}", url, e)))?;

        let text = html_to_text(&html);
        if text.is_empty() {
            return Err(DigestError::Summarize(format!("no readable text at {}", url)));
        }
        Ok(text)
    }
}

impl Summarizer for GeminiSummarizer {
    fn summarize_url(&self, url: &str) -> DigestResult<String> {
        let page = self.fetch_page_text(url)?;
        let body = format!("URL: {}\n\n{}", url, page);

        tracing::debug!(url, chars = page.len(), mode = ?self.mode, "summarizing page");
        self.generate(&Self::build_prompt(self.mode.instructions(), &body))
    }

    fn summarize_text(&self, text: &str) -> DigestResult<String> {
        tracing::debug!(chars = text.len(), "summarizing discussion");
        self.generate(&Self::build_prompt(self.mode.comment_instructions(), text))
    }
}

/// Extract readable text from an HTML page, skipping scripts and styles
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            let hidden = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name()))
                .map(|name| matches!(name, "script" | "style" | "noscript" | "template"))
                .unwrap_or(false);
            if !hidden {
                text.push_str(text_node);
                text.push(' ');
            }
        }
    }

    // Collapse whitespace and trim
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters on a char boundary
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
