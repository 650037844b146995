use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{DigestError, DigestResult};
use crate::storage::traits::DocumentStore;

/// Documents kept as files under a root directory
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, path: &str) -> DigestResult<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() || relative.components().any(|c| c.as_os_str() == "..") {
            return Err(DigestError::IndexIo(format!(
                "document path must stay under the store root: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl DocumentStore for FileDocumentStore {
    fn read(&self, path: &str) -> DigestResult<Option<Vec<u8>>> {
        let full = self.resolve(path)?;
        match fs::read(&full) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &str, body: &[u8]) -> DigestResult<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }

        // Readers never observe a half-written document
        let tmp = full.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &full)?;
        Ok(())
    }

    fn close(&self) -> DigestResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(dir.path());
        assert!(store.read("processed_articles.json").unwrap().is_none());
    }

    #[test]
    fn test_write_creates_parent_dirs_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(dir.path());

        store.write("state/index.json", b"[1]").unwrap();
        store.write("state/index.json", b"[2]").unwrap();

        assert_eq!(store.read("state/index.json").unwrap().unwrap(), b"[2]");
        assert!(!dir.path().join("state/index.tmp").exists());
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(dir.path());

        assert!(matches!(
            store.read("../outside.json"),
            Err(DigestError::IndexIo(_))
        ));
    }
}
