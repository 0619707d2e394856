use crate::error::ClientError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// A string key-value store shared by everything that needs the session.
///
/// Writers do not coordinate: the last write to a key wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// An in-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// A store persisted as a single JSON object on disk.
///
/// The whole file is rewritten on every mutation through a temporary file
/// and a rename, so a crash never leaves a half-written session behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ClientError::Store(format!("Corrupt store {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(ClientError::Store(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::Store(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| ClientError::Store(format!("Serialization error: {}", e)))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| ClientError::Store(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| ClientError::Store(format!("Failed to replace {}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_overwrites_and_removes() {
        let store = MemoryStore::new();
        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("access_token").await.unwrap(), None);
        store.set("access_token", "A1").await.unwrap();
        store.set("theme", "dark").await.unwrap();
        store.remove("theme").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("access_token").await.unwrap().as_deref(),
            Some("A1")
        );
        assert_eq!(reopened.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::open(&path).await.unwrap();
        store.set("access_token", "A1").await.unwrap();

        // A directory where the temp file goes makes every write fail.
        tokio::fs::create_dir(path.with_extension("tmp")).await.unwrap();

        let err = store.set("access_token", "A2").await.unwrap_err();
        assert!(matches!(err, ClientError::Store(_)));
        assert_eq!(store.get("access_token").await.unwrap().as_deref(), Some("A1"));

        assert!(store.remove("access_token").await.is_err());
        assert_eq!(store.get("access_token").await.unwrap().as_deref(), Some("A1"));

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("access_token").await.unwrap().as_deref(), Some("A1"));
    }

    #[tokio::test]
    async fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let err = FileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, ClientError::Store(_)));
    }
}
