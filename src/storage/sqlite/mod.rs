pub mod connection;
pub mod document_store;

pub use connection::SqliteStorage;
pub use document_store::SqliteDocumentStore;
