use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use feed_digest::cli::{Cli, Commands};
use feed_digest::config::{Config, FeedsConfig, IndexBackend, INDEX_FILE_NAME};
use feed_digest::logging;
use feed_digest::services::{
    limiter_for, FeedService, GeminiSummarizer, SlackNotifier, SummaryMode, UrlService,
};
use feed_digest::sources::{HttpFetcher, StrategyRegistry};
use feed_digest::storage::{
    FileDocumentStore, JsonIndexRepository, ProcessedRepository, SqliteDocumentStore,
    SqliteStorage,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Listing feeds needs no credentials
        Commands::Feeds => {
            Config::load_dotenv();
            cmd_feeds()
        }
        command => {
            let config = Config::from_env().context("loading configuration")?;
            logging::init(&config.log_level);
            dispatch(command, &config)
        }
    }
}

fn dispatch(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run { feeds } => match config.index_backend {
            IndexBackend::File => cmd_run(file_repository(config), config, &feeds),
            IndexBackend::Sqlite => cmd_run(sqlite_repository(config)?, config, &feeds),
        },
        Commands::Summarize { url, channel } => cmd_summarize(config, &url, channel),
        Commands::Index { limit } => match config.index_backend {
            IndexBackend::File => cmd_index(file_repository(config), limit),
            IndexBackend::Sqlite => cmd_index(sqlite_repository(config)?, limit),
        },
        Commands::Feeds => cmd_feeds(),
    }
}

fn file_repository(config: &Config) -> JsonIndexRepository<FileDocumentStore> {
    let root = config
        .index_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = config
        .index_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(INDEX_FILE_NAME);

    JsonIndexRepository::with_path(FileDocumentStore::new(root), file_name)
}

fn sqlite_repository(config: &Config) -> Result<JsonIndexRepository<SqliteDocumentStore>> {
    if let Some(parent) = config.index_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let storage = SqliteStorage::new(&config.index_path)
        .with_context(|| format!("opening {}", config.index_path.display()))?;
    Ok(JsonIndexRepository::new(SqliteDocumentStore::new(storage)))
}

fn cmd_feeds() -> Result<()> {
    let registry = StrategyRegistry::from_config(FeedsConfig::from_env());

    println!("Available feeds:\n");
    for (name, strategy) in registry.iter() {
        let info = strategy.config();
        println!("  {} ({})", name, info.display_name);
        println!("    URL: {}", info.url);
    }

    Ok(())
}

fn cmd_run<R: ProcessedRepository>(repository: R, config: &Config, feeds: &[String]) -> Result<()> {
    let service = FeedService::new(
        StrategyRegistry::from_config(config.feeds.clone()),
        repository,
        Box::new(HttpFetcher::new()?),
        Box::new(GeminiSummarizer::from_config(config, SummaryMode::Feed)?),
        Box::new(SlackNotifier::new(config)?),
        limiter_for(config.article_limit),
        config.channels.clone(),
    );

    // Reject typos before any feed is touched
    for feed in feeds {
        service.registry().get(feed)?;
    }

    service.run_feeds(feeds, |report| {
        println!(
            "{}: {} fetched, {} selected, {} processed",
            report.feed,
            report.fetched,
            report.selected,
            report.processed.len()
        );
        for key in &report.processed {
            println!("  + {}", key);
        }
    })?;

    Ok(())
}

fn cmd_summarize(config: &Config, url: &str, channel: Option<String>) -> Result<()> {
    let service = UrlService::new(
        Box::new(GeminiSummarizer::from_config(config, SummaryMode::OnDemand)?),
        Box::new(SlackNotifier::new(config)?),
    );

    let channel = channel.unwrap_or_else(|| config.channels.default.clone());
    let summary = service.process(url, &channel)?;

    println!("Posted to {}:\n\n{}", channel, summary);
    Ok(())
}

fn cmd_index<R: ProcessedRepository>(repository: R, limit: Option<usize>) -> Result<()> {
    let index = repository.load_index()?;
    repository.close()?;

    if index.is_empty() {
        println!("No processed articles.");
        return Ok(());
    }

    let mut entries: Vec<_> = index.into_values().collect();
    entries.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
    let shown = limit.unwrap_or(entries.len());

    println!("Processed articles ({} total):\n", entries.len());
    for entry in entries.iter().take(shown) {
        println!(
            "  {} [{}] {}",
            entry.processed_at.format("%Y-%m-%d %H:%M"),
            entry.source,
            entry.title
        );
        println!("    {}", entry.canonical_url);
    }

    Ok(())
}
