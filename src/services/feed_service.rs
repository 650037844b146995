use std::collections::HashSet;

use crate::config::ChannelRoutes;
use crate::domain::{Item, Notification, ProcessedIndex};
use crate::errors::{DigestResult, ResultExt};
use crate::services::limiter::ArticleLimiter;
use crate::services::notification_service::Notifier;
use crate::services::summarizer::Summarizer;
use crate::sources::{FeedStrategy, Fetcher, StrategyRegistry};
use crate::storage::{generate_key, is_processed, ProcessedRepository};

/// Outcome of one feed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub feed: String,
    /// Items parsed from the feed document
    pub fetched: usize,
    /// Unprocessed items left after filtering and limiting
    pub selected: usize,
    /// Index keys of the articles finished in this run, in order
    pub processed: Vec<String>,
}

impl ProcessReport {
    fn new(feed: &str) -> Self {
        Self {
            feed: feed.to_string(),
            fetched: 0,
            selected: 0,
            processed: Vec::new(),
        }
    }
}

/// Runs a feed end to end: fetch, select, summarize, notify, record.
///
/// Articles are handled one at a time and each is recorded in the index as
/// soon as its notifications succeed, so a failure part-way through a run
/// keeps everything finished before it.
pub struct FeedService<R: ProcessedRepository> {
    registry: StrategyRegistry,
    repository: R,
    fetcher: Box<dyn Fetcher>,
    summarizer: Box<dyn Summarizer>,
    notifier: Box<dyn Notifier>,
    limiter: Box<dyn ArticleLimiter>,
    channels: ChannelRoutes,
}

impl<R: ProcessedRepository> FeedService<R> {
    pub fn new(
        registry: StrategyRegistry,
        repository: R,
        fetcher: Box<dyn Fetcher>,
        summarizer: Box<dyn Summarizer>,
        notifier: Box<dyn Notifier>,
        limiter: Box<dyn ArticleLimiter>,
        channels: ChannelRoutes,
    ) -> Self {
        Self {
            registry,
            repository,
            fetcher,
            summarizer,
            notifier,
            limiter,
            channels,
        }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Process every new article of `feed_name`. The first error aborts the run.
    pub fn process(&self, feed_name: &str) -> DigestResult<ProcessReport> {
        let strategy = self.registry.get(feed_name)?;
        let info = strategy.config();
        let mut report = ProcessReport::new(feed_name);

        tracing::info!(feed = feed_name, name = %info.display_name, url = %info.url, "processing feed");

        let items = self
            .fetch_items(strategy)
            .with_context(|| format!("fetching feed {}", feed_name))?;
        report.fetched = items.len();

        let items = strategy.filter_items(dedupe_batch(items));

        let index = self
            .repository
            .load_index()
            .context("loading processed index")?;
        let unprocessed = select_unprocessed(items, &index);

        if unprocessed.is_empty() {
            tracing::info!(feed = feed_name, fetched = report.fetched, "no new articles");
            return Ok(report);
        }

        let selected = self.limiter.limit(unprocessed);
        report.selected = selected.len();
        tracing::info!(feed = feed_name, selected = report.selected, "articles selected");

        let channel = self.channels.channel_for(feed_name);
        for item in &selected {
            self.process_article(strategy, item, channel)
                .with_context(|| format!("processing article {}", item.title))?;
            report.processed.push(generate_key(item));
        }

        tracing::info!(
            feed = feed_name,
            processed = report.processed.len(),
            "feed finished"
        );
        Ok(report)
    }

    /// Process `feeds` in order, handing each report to `on_report`, then
    /// release the index backend. Stops at the first failing feed; articles
    /// recorded before it stay recorded. A processing error wins over a
    /// close error.
    pub fn run_feeds<F>(&self, feeds: &[String], mut on_report: F) -> DigestResult<()>
    where
        F: FnMut(&ProcessReport),
    {
        let outcome = feeds.iter().try_for_each(|feed| -> DigestResult<()> {
            let report = self.process(feed)?;
            on_report(&report);
            Ok(())
        });
        let closed = self.close();

        if let (Err(_), Err(e)) = (&outcome, &closed) {
            tracing::warn!(error = %e, "closing index after failed run");
        }
        outcome?;
        closed
    }

    /// Release the index backend
    pub fn close(&self) -> DigestResult<()> {
        self.repository.close()
    }

    fn fetch_items(&self, strategy: &dyn FeedStrategy) -> DigestResult<Vec<Item>> {
        let info = strategy.config();
        let body = self
            .fetcher
            .fetch_bytes(&info.url, &strategy.request_headers())?;
        let mut items = strategy.parse_feed(&body)?;

        for item in &mut items {
            item.source = strategy.source();
            item.publish_date = match strategy.parse_date(&item.publish_date_raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    if !item.publish_date_raw.is_empty() {
                        tracing::debug!(title = %item.title, error = %e, "unparseable publish date");
                    }
                    None
                }
            };
        }

        tracing::debug!(url = %info.url, items = items.len(), "feed parsed");
        Ok(items)
    }

    fn process_article(
        &self,
        strategy: &dyn FeedStrategy,
        item: &Item,
        channel: &str,
    ) -> DigestResult<()> {
        tracing::info!(title = %item.title, link = %item.link, "processing article");

        let summary = self
            .summarizer
            .summarize_url(&item.link)
            .context("summarizing article")?;
        self.notifier
            .notify(&Notification::article(item, summary).format(), channel)
            .context("notifying article")?;

        if item.has_discussion() {
            let thread = strategy
                .fetch_comments(self.fetcher.as_ref(), &item.comment_url)
                .context("fetching comments")?;
            let summary = self
                .summarizer
                .summarize_text(&thread)
                .context("summarizing comments")?;
            self.notifier
                .notify(&Notification::comments(item, summary).format(), channel)
                .context("notifying comments")?;
        }

        self.repository
            .mark_as_processed(item)
            .context("recording article")
    }
}

/// Drop repeats of an identity within one fetch, keeping the first
pub fn dedupe_batch(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.identity().to_string()))
        .collect()
}

/// Items whose key is neither in `index` nor already taken earlier in this
/// batch, in feed order
pub fn select_unprocessed(items: Vec<Item>, index: &ProcessedIndex) -> Vec<Item> {
    let mut selected = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let key = generate_key(item);
            !is_processed(&key, index) && selected.insert(key)
        })
        .collect()
}
