//! The encrypted vault.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::payload::EncryptedPayload;
use crate::store::{FileStore, KeyValueStore};

/// Logical key used when the caller names none.
pub const DEFAULT_KEY: &str = "latest";

/// Passphrase-encrypted storage of analyses under logical keys.
///
/// The passphrase is never stored. Key derivation runs on the blocking pool.
#[derive(Clone)]
pub struct Vault {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    iterations: u32,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("namespace", &self.namespace)
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

impl Vault {
    /// Open a file-backed vault.
    pub async fn open(config: VaultConfig) -> VaultResult<Self> {
        let store = FileStore::open(config.resolved_root()?).await?;
        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Use an existing store.
    pub fn with_store(store: Arc<dyn KeyValueStore>, config: VaultConfig) -> Self {
        Self {
            store,
            namespace: config.namespace,
            iterations: config.iterations,
        }
    }

    /// Encrypt `value` and store it under `key`, replacing any previous value.
    pub async fn save_encrypted<T: Serialize>(
        &self,
        value: &T,
        passphrase: &str,
        key: &str,
    ) -> VaultResult<()> {
        let plaintext = Zeroizing::new(
            serde_json::to_vec(value).map_err(|source| VaultError::Serialization { source })?,
        );
        let passphrase = Zeroizing::new(passphrase.to_string());
        let iterations = self.iterations;

        let payload = tokio::task::spawn_blocking(move || {
            EncryptedPayload::seal(&plaintext, &passphrase, iterations)
        })
        .await
        .map_err(VaultError::crypto)??;

        self.store.put(&self.store_key(key), payload.to_json()?).await?;
        tracing::info!(key, "saved encrypted analysis");
        Ok(())
    }

    /// Load and decrypt the value stored under `key`.
    pub async fn load_encrypted<T: DeserializeOwned>(
        &self,
        passphrase: &str,
        key: &str,
    ) -> VaultResult<T> {
        let text = self
            .store
            .get(&self.store_key(key))
            .await?
            .ok_or_else(|| VaultError::NotFound {
                key: key.to_string(),
            })?;
        let payload = EncryptedPayload::from_json(key, &text)?;

        let passphrase = Zeroizing::new(passphrase.to_string());
        let iterations = self.iterations;
        let owned_key = key.to_string();
        let plaintext = tokio::task::spawn_blocking(move || {
            payload.open(&owned_key, &passphrase, iterations)
        })
        .await
        .map_err(VaultError::crypto)??;

        let value = serde_json::from_slice(&plaintext)
            .map_err(|source| VaultError::Serialization { source })?;
        tracing::info!(key, "loaded encrypted analysis");
        Ok(value)
    }

    /// Delete one logical key, or every key in the namespace when `key` is `None`.
    ///
    /// Returns how many entries were removed.
    pub async fn clear_encrypted(&self, key: Option<&str>) -> VaultResult<usize> {
        let removed = match key {
            Some(key) => usize::from(self.store.delete(&self.store_key(key)).await?),
            None => {
                let mut removed = 0;
                for key in self.list_stored_keys().await? {
                    if self.store.delete(&self.store_key(&key)).await? {
                        removed += 1;
                    }
                }
                removed
            }
        };
        tracing::info!(key, removed, "cleared encrypted analyses");
        Ok(removed)
    }

    /// Logical keys in the namespace, sorted, without decrypting anything.
    pub async fn list_stored_keys(&self) -> VaultResult<Vec<String>> {
        let prefix = self.prefix();
        let mut keys: Vec<String> = self
            .store
            .keys()
            .await?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn prefix(&self) -> String {
        format!("{}:", self.namespace)
    }

    fn store_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix())
    }
}
