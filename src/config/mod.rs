use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::{Source, StrategyConfig};
use crate::errors::{DigestError, DigestResult};
use crate::sources::{hatena, lobsters, reddit};

pub const DEFAULT_ARTICLE_LIMIT: usize = 5;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const INDEX_FILE_NAME: &str = "processed_articles.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexBackend {
    File,
    Sqlite,
}

impl std::str::FromStr for IndexBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(IndexBackend::File),
            "sqlite" => Ok(IndexBackend::Sqlite),
            _ => Err(format!("Unknown index backend: {}", s)),
        }
    }
}

/// Per-source strategy settings handed to the registry
#[derive(Debug, Clone)]
pub struct FeedsConfig {
    pub hatena: StrategyConfig,
    pub reddit: StrategyConfig,
    pub lobsters: StrategyConfig,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            hatena: hatena::default_config(),
            reddit: reddit::default_config(),
            lobsters: lobsters::default_config(),
        }
    }
}

impl FeedsConfig {
    /// Defaults with `<SOURCE>_FEED_URL` overrides applied
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            hatena: defaults.hatena.with_feed_url(std::env::var("HATENA_FEED_URL").ok()),
            reddit: defaults.reddit.with_feed_url(std::env::var("REDDIT_FEED_URL").ok()),
            lobsters: defaults
                .lobsters
                .with_feed_url(std::env::var("LOBSTERS_FEED_URL").ok()),
        }
    }
}

/// Which chat channel each feed's notifications go to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRoutes {
    pub default: String,
    pub per_feed: BTreeMap<String, String>,
}

impl ChannelRoutes {
    pub fn new(default: &str) -> Self {
        Self {
            default: default.to_string(),
            per_feed: BTreeMap::new(),
        }
    }

    pub fn with_feed(mut self, feed_name: &str, channel: &str) -> Self {
        self.per_feed
            .insert(feed_name.trim().to_lowercase(), channel.to_string());
        self
    }

    /// Channel that notifications for `feed_name` go to
    pub fn channel_for(&self, feed_name: &str) -> &str {
        self.per_feed
            .get(&feed_name.trim().to_lowercase())
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub slack_api_url: String,
    pub slack_token: String,
    pub channels: ChannelRoutes,
    pub gemini_api_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub index_backend: IndexBackend,
    pub index_path: PathBuf,
    pub article_limit: usize,
    pub log_level: String,
    pub feeds: FeedsConfig,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Load `.env` from the executable's directory, then the current one
    pub fn load_dotenv() {
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        dotenvy::dotenv().ok();
    }

    fn required(name: &str) -> DigestResult<String> {
        std::env::var(name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DigestError::MissingEnvVar(name.to_string()))
    }

    fn optional(name: &str, default: &str) -> String {
        std::env::var(name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn from_env() -> DigestResult<Self> {
        Self::load_dotenv();

        let slack_token = Self::required("SLACK_BOT_TOKEN")?;
        let gemini_api_key = Self::required("GEMINI_API_KEY")?;

        let index_backend = Self::optional("INDEX_BACKEND", "file")
            .parse::<IndexBackend>()
            .map_err(DigestError::Config)?;

        // Default index path is relative to executable directory
        let index_path = std::env::var("INDEX_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let file_name = match index_backend {
                    IndexBackend::File => INDEX_FILE_NAME,
                    IndexBackend::Sqlite => "feed-digest.db",
                };
                Self::exe_dir()
                    .map(|d| d.join(file_name))
                    .unwrap_or_else(|| PathBuf::from(file_name))
            });

        let article_limit = Self::optional("ARTICLE_LIMIT", &DEFAULT_ARTICLE_LIMIT.to_string())
            .trim()
            .parse::<usize>()
            .map_err(|e| DigestError::Config(format!("ARTICLE_LIMIT: {}", e)))?;

        let mut channels = ChannelRoutes::new(&Self::optional("SLACK_CHANNEL", "feeds"));
        for source in Source::ALL {
            let var = format!("SLACK_CHANNEL_{}", source.as_str().to_uppercase());
            if let Some(channel) = std::env::var(var).ok().filter(|v| !v.trim().is_empty()) {
                channels = channels.with_feed(source.as_str(), &channel);
            }
        }

        Ok(Self {
            slack_api_url: Self::optional("SLACK_API_URL", chat::DEFAULT_API_URL),
            slack_token,
            channels,
            gemini_api_url: Self::optional("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            gemini_api_key,
            gemini_model: Self::optional("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            index_backend,
            index_path,
            article_limit,
            log_level: Self::optional("LOG_LEVEL", "info"),
            feeds: FeedsConfig::from_env(),
        })
    }
}
