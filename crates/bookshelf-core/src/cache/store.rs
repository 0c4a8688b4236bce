use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

/// Persistent key/value store. Each key is one JSON file in the directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    cache_dir: PathBuf,
}

impl CacheStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;
        Ok(Self { cache_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.cache_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read cache entry: {}", key)),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.cache_path(key), value)
            .with_context(|| format!("Failed to write cache entry: {}", key))
    }

    /// Remove an entry. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.cache_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove cache entry: {}", key)),
        }
    }

    /// Last write time of an entry, if it exists.
    pub fn modified(&self, key: &str) -> Option<SystemTime> {
        std::fs::metadata(self.cache_path(key))
            .and_then(|m| m.modified())
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("nested")).unwrap();

        assert_eq!(store.get("books").unwrap(), None);
        assert!(store.modified("books").is_none());

        store.set("books", "[]").unwrap();
        assert_eq!(store.get("books").unwrap().as_deref(), Some("[]"));
        assert!(store.modified("books").is_some());

        store.remove("books").unwrap();
        assert_eq!(store.get("books").unwrap(), None);
        // Second remove is a no-op
        store.remove("books").unwrap();
    }

    #[test]
    fn test_entries_survive_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        CacheStore::new(dir.path().to_path_buf())
            .unwrap()
            .set("books", "[1]")
            .unwrap();

        let reopened = CacheStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.get("books").unwrap().as_deref(), Some("[1]"));
    }
}
