use crate::domain::{Item, ProcessedIndex};
use crate::errors::DigestResult;

/// Whole-document blob storage keyed by path
#[cfg_attr(test, mockall::automock)]
pub trait DocumentStore: Send + Sync {
    /// `None` when no document exists at `path`
    fn read(&self, path: &str) -> DigestResult<Option<Vec<u8>>>;
    fn write(&self, path: &str, body: &[u8]) -> DigestResult<()>;
    fn close(&self) -> DigestResult<()>;
}

/// Persisted record of which articles have already been handled
#[cfg_attr(test, mockall::automock)]
pub trait ProcessedRepository: Send + Sync {
    /// Whole index; a missing document is an empty index
    fn load_index(&self) -> DigestResult<ProcessedIndex>;

    /// Reload, insert the entry for `item`, and persist the whole index
    fn mark_as_processed(&self, item: &Item) -> DigestResult<()>;

    fn close(&self) -> DigestResult<()>;
}
