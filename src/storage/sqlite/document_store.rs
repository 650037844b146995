use crate::errors::DigestResult;
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::DocumentStore;

/// Documents kept as rows of the `documents` table
pub struct SqliteDocumentStore {
    storage: SqliteStorage,
}

impl SqliteDocumentStore {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn read(&self, path: &str) -> DigestResult<Option<Vec<u8>>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT body FROM documents WHERE path = ?1")?;

        match stmt.query_row([path], |row| row.get::<_, Vec<u8>>(0)) {
            Ok(body) => Ok(Some(body)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &str, body: &[u8]) -> DigestResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO documents (path, body, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(path) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
            (path, body),
        )?;
        Ok(())
    }

    fn close(&self) -> DigestResult<()> {
        let conn = self.storage.connection()?;
        conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> SqliteDocumentStore {
        SqliteDocumentStore::new(SqliteStorage::in_memory().unwrap())
    }

    #[test]
    fn test_missing_document_is_none() {
        let store = setup();
        assert!(store.read("processed_articles.json").unwrap().is_none());
    }

    #[test]
    fn test_write_then_overwrite() {
        let store = setup();

        store.write("doc.json", b"{\"a\":1}").unwrap();
        assert_eq!(store.read("doc.json").unwrap().unwrap(), b"{\"a\":1}");

        store.write("doc.json", b"{\"b\":2}").unwrap();
        assert_eq!(store.read("doc.json").unwrap().unwrap(), b"{\"b\":2}");
        assert!(store.read("other.json").unwrap().is_none());
    }

    #[test]
    fn test_close() {
        let store = setup();
        store.write("doc.json", b"{}").unwrap();
        store.close().unwrap();
    }
}
