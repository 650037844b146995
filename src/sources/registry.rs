use std::collections::BTreeMap;

use crate::config::FeedsConfig;
use crate::errors::{DigestError, DigestResult};
use crate::sources::traits::FeedStrategy;
use crate::sources::{hatena::HatenaStrategy, lobsters::LobstersStrategy, reddit::RedditStrategy};

/// Feed name → strategy, built once at startup
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Box<dyn FeedStrategy>>,
}

impl StrategyRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Registry with the built-in sources, configured from `config`
    pub fn from_config(config: FeedsConfig) -> Self {
        let mut registry = Self::new();

        registry.register("hatena", Box::new(HatenaStrategy::new(config.hatena)));
        registry.register("reddit", Box::new(RedditStrategy::new(config.reddit)));
        registry.register("lobsters", Box::new(LobstersStrategy::new(config.lobsters)));

        registry
    }

    pub fn register(&mut self, name: &str, strategy: Box<dyn FeedStrategy>) {
        self.strategies.insert(name.trim().to_lowercase(), strategy);
    }

    /// Look up a strategy by feed name
    pub fn get(&self, name: &str) -> DigestResult<&dyn FeedStrategy> {
        self.strategies
            .get(&name.trim().to_lowercase())
            .map(|s| s.as_ref())
            .ok_or_else(|| DigestError::UnknownFeed(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn FeedStrategy)> {
        self.strategies
            .iter()
            .map(|(name, strategy)| (name.as_str(), strategy.as_ref()))
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::from_config(FeedsConfig::default())
    }
}
