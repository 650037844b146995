pub mod feed;
pub mod article;
pub mod index_entry;
pub mod notification;

pub use feed::{FeedInfo, Source, StrategyConfig};
pub use article::Item;
pub use index_entry::{IndexEntry, ProcessedIndex};
pub use notification::{Notification, NotificationKind};
