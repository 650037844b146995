pub mod feed_service;
pub mod limiter;
pub mod notification_service;
pub mod summarizer;
pub mod url_service;

pub use feed_service::{FeedService, ProcessReport};
pub use limiter::{limiter_for, ArticleLimiter, MaxArticleLimiter, NoopLimiter};
pub use notification_service::{Notifier, SlackNotifier};
pub use summarizer::{GeminiSummarizer, Summarizer, SummaryMode};
pub use url_service::UrlService;
