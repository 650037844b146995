pub mod traits;
pub mod dates;
pub mod fetcher;
pub mod xml;
pub mod hatena;
pub mod reddit;
pub mod lobsters;
pub mod registry;

pub use traits::FeedStrategy;
pub use fetcher::{Fetcher, HttpFetcher};
pub use registry::StrategyRegistry;

#[cfg(test)]
pub use fetcher::MockFetcher;
