use chrono::Utc;

use crate::domain::{IndexEntry, Item, ProcessedIndex};
use crate::errors::{DigestError, DigestResult};
use crate::storage::key::generate_key;
use crate::storage::traits::{DocumentStore, ProcessedRepository};

/// Well-known path of the processed-articles document
pub const INDEX_DOCUMENT: &str = "processed_articles.json";

/// Processed index persisted as one JSON object in a [`DocumentStore`].
///
/// `mark_as_processed` is a plain read-modify-write of the whole document.
/// Two concurrent writers can each read the same base and the last write
/// wins, dropping the other's entry; the article then gets re-notified on a
/// later run.
pub struct JsonIndexRepository<S: DocumentStore> {
    store: S,
    path: String,
}

impl<S: DocumentStore> JsonIndexRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_path(store, INDEX_DOCUMENT)
    }

    pub fn with_path(store: S, path: &str) -> Self {
        Self {
            store,
            path: path.to_string(),
        }
    }

    fn save_index(&self, index: &ProcessedIndex) -> DigestResult<()> {
        let body = serde_json::to_vec_pretty(index)
            .map_err(|e| DigestError::IndexIo(format!("encoding {}: {}", self.path, e)))?;

        self.store
            .write(&self.path, &body)
            .map_err(|e| DigestError::IndexIo(format!("writing {}: {}", self.path, e)))
    }
}

impl<S: DocumentStore> ProcessedRepository for JsonIndexRepository<S> {
    fn load_index(&self) -> DigestResult<ProcessedIndex> {
        let body = self
            .store
            .read(&self.path)
            .map_err(|e| DigestError::IndexIo(format!("reading {}: {}", self.path, e)))?;

        let Some(body) = body else {
            tracing::debug!(path = %self.path, "index document not found, starting empty");
            return Ok(ProcessedIndex::new());
        };

        serde_json::from_slice(&body)
            .map_err(|e| DigestError::IndexIo(format!("decoding {}: {}", self.path, e)))
    }

    fn mark_as_processed(&self, item: &Item) -> DigestResult<()> {
        // Fresh read rather than the caller's snapshot narrows the lost-update window
        let mut index = self.load_index()?;

        let key = generate_key(item);
        let entry = IndexEntry::from_item(item, key.clone(), Utc::now());
        index.insert(key.clone(), entry);

        self.save_index(&index)?;
        tracing::debug!(key = %key, entries = index.len(), "marked article as processed");
        Ok(())
    }

    fn close(&self) -> DigestResult<()> {
        self.store.close()
    }
}
