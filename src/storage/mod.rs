pub mod traits;
pub mod key;
pub mod file_store;
pub mod index_repository;
pub mod sqlite;

pub use traits::{DocumentStore, ProcessedRepository};
pub use key::{generate_key, is_processed, normalize_url};
pub use file_store::FileDocumentStore;
pub use index_repository::{JsonIndexRepository, INDEX_DOCUMENT};
pub use sqlite::{SqliteDocumentStore, SqliteStorage};
