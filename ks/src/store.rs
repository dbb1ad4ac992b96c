//! Key-value store implementations

use eyre::{Context, Result};
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::DOCUMENT_EXTENSION;

/// A string-keyed store of whole documents
pub trait KeyValueStore {
    /// Read the raw document stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// List stored keys in sorted order
    fn keys(&self) -> Result<Vec<String>>;

    /// Read and deserialize a JSON document
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw).context(format!("Corrupt document under key: {}", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serialize and store a JSON document
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string_pretty(value)?;
        self.set(key, &raw)
    }
}

/// Directory-backed store, one `<key>.json` file per document
#[derive(Debug)]
pub struct FileStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl FileStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened file store");
        Ok(Self { base_path })
    }

    fn document_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.{}", key, DOCUMENT_EXTENSION)))
    }

    fn lock(&self) -> Result<fs::File> {
        let lock_path = self.base_path.join(".lock");
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .context(format!("Failed to open lock file: {}", lock_path.display()))?;
        file.lock_exclusive().context("Failed to lock store")?;
        Ok(file)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.document_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(format!("Failed to read document: {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.document_path(key)?;
        let tmp_path = self.base_path.join(format!(".{}.{}.tmp", key, DOCUMENT_EXTENSION));

        // Lock is released when the handle drops
        let _lock = self.lock()?;
        fs::write(&tmp_path, value).context(format!("Failed to write document: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path).context(format!("Failed to replace document: {}", path.display()))?;

        debug!(key, bytes = value.len(), "Stored document");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.document_path(key)?;
        let _lock = self.lock()?;
        if path.exists() {
            fs::remove_file(&path)?;
            info!(key, "Removed document");
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().map(|e| e == DOCUMENT_EXTENSION).unwrap_or(false)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && !stem.starts_with('.')
            {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// In-memory store, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.documents
            .lock()
            .map_err(|_| eyre::eyre!("Memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.documents()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.documents()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.documents()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.documents()?.keys().cloned().collect())
    }
}

/// Keys become file names, so keep them to a safe character set
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !valid {
        return Err(eyre::eyre!("Invalid store key: {:?}", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_set_and_get() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path().join("store")).unwrap();

        assert_eq!(store.get("weeklyTasks").unwrap(), None);

        store.set("weeklyTasks", "{\"monday\":[]}").unwrap();
        assert_eq!(store.get("weeklyTasks").unwrap().as_deref(), Some("{\"monday\":[]}"));

        store.set("weeklyTasks", "{}").unwrap();
        assert_eq!(store.get("weeklyTasks").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_store_keys_and_remove() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        store.set("weeklyReports", "[]").unwrap();
        store.set("lastWeekStart", "\"2026-10-12\"").unwrap();

        let keys = store.keys().unwrap();
        assert_eq!(keys, vec!["lastWeekStart".to_string(), "weeklyReports".to_string()]);

        store.remove("weeklyReports").unwrap();
        store.remove("weeklyReports").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["lastWeekStart".to_string()]);
    }

    #[test]
    fn test_file_store_json_helpers() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        store.set_json("counts", &vec![1, 2, 3]).unwrap();
        let counts: Option<Vec<u32>> = store.get_json("counts").unwrap();
        assert_eq!(counts, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u32>> = store.get_json("missing").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let store = MemoryStore::new();
        store.set("broken", "{not json").unwrap();
        let result: Result<Option<Vec<u32>>> = store.get_json("broken");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let store = MemoryStore::new();
        assert!(store.set("", "x").is_err());
        assert!(store.set("../escape", "x").is_err());
        assert!(store.set(".hidden", "x").is_err());
        assert!(store.set("has space", "x").is_err());
        assert!(store.set("weekly-tasks_v2.bak", "x").is_ok());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
