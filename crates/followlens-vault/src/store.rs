//! Key-value store backends.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;

use crate::error::{VaultError, VaultResult};

/// A local persistent string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`.
    async fn get(&self, key: &str) -> VaultResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: String) -> VaultResult<()>;

    /// Remove `key`. Returns whether it existed.
    async fn delete(&self, key: &str) -> VaultResult<bool>;

    /// Every key in the store.
    async fn keys(&self) -> VaultResult<Vec<String>>;
}

/// Store backed by one file per key in a directory.
///
/// File names are the URL-safe base64 of the key, so any key is a valid
/// file name.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

const FILE_SUFFIX: &str = ".json";

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> VaultResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| VaultError::StorageUnavailable {
                path: root.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { root })
    }

    /// The store's directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}{FILE_SUFFIX}", URL_SAFE_NO_PAD.encode(key)))
    }

    fn key_for(file_name: &str) -> Option<String> {
        let encoded = file_name.strip_suffix(FILE_SUFFIX)?;
        let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        String::from_utf8(bytes).ok()
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> VaultResult<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::io(path, e)),
        }
    }

    async fn put(&self, key: &str, value: String) -> VaultResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| VaultError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| VaultError::io(&path, e))
    }

    async fn delete(&self, key: &str) -> VaultResult<bool> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VaultError::io(path, e)),
        }
    }

    async fn keys(&self) -> VaultResult<Vec<String>> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| VaultError::io(&self.root, e))?;

        let mut keys = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| VaultError::io(&self.root, e))?
        {
            if let Some(key) = entry.file_name().to_str().and_then(Self::key_for) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

/// In-memory store, mostly for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    async fn put(&self, key: &str, value: String) -> VaultResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> VaultResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn keys(&self) -> VaultResult<Vec<String>> {
        Ok(self.entries.iter().map(|entry| entry.key().clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_crud() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("vault")).await.unwrap();

        assert_eq!(store.get("ns:latest").await.unwrap(), None);
        store.put("ns:latest", "one".into()).await.unwrap();
        store.put("ns:latest", "two".into()).await.unwrap();
        store.put("ns:a/b c", "three".into()).await.unwrap();

        assert_eq!(store.get("ns:latest").await.unwrap().as_deref(), Some("two"));
        let mut keys = store.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, ["ns:a/b c", "ns:latest"]);

        assert!(store.delete("ns:latest").await.unwrap());
        assert!(!store.delete("ns:latest").await.unwrap());
        assert_eq!(store.keys().await.unwrap(), ["ns:a/b c"]);
    }

    #[tokio::test]
    async fn test_memory_store_crud() {
        let store = MemoryStore::new();
        store.put("k", "v".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.keys().await.unwrap(), ["k"]);
        assert!(store.delete("k").await.unwrap());
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_open_on_file_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let err = FileStore::open(blocker.join("vault")).await.unwrap_err();
        assert!(matches!(err, VaultError::StorageUnavailable { .. }));
    }
}
