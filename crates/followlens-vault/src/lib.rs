//! Passphrase-encrypted local persistence for followlens.
//!
//! Analyses are serialized to JSON, encrypted with AES-256-GCM under a key
//! derived from the passphrase with PBKDF2-HMAC-SHA256, and stored as a
//! versioned envelope under `{namespace}:{key}` in a [`KeyValueStore`].
//! Salt and IV are fresh for every save. The passphrase is never stored.
//!
//! # Example
//!
//! ```rust,no_run
//! use followlens_vault::{PersistedAnalysis, Vault, VaultConfig, DEFAULT_KEY};
//!
//! # async fn run(analysis: PersistedAnalysis) -> followlens_vault::VaultResult<()> {
//! let vault = Vault::open(VaultConfig::default()).await?;
//! vault.save_encrypted(&analysis, "correct horse", DEFAULT_KEY).await?;
//!
//! let loaded: PersistedAnalysis = vault.load_encrypted("correct horse", DEFAULT_KEY).await?;
//! assert_eq!(loaded, analysis);
//! # Ok(())
//! # }
//! ```

mod analysis;
mod config;
pub mod crypto;
mod error;
mod payload;
mod store;
mod vault;

pub use analysis::PersistedAnalysis;
pub use config::{DEFAULT_NAMESPACE, VaultConfig, VaultConfigBuilder};
pub use error::{VaultError, VaultResult};
pub use payload::{EncryptedPayload, PAYLOAD_VERSION};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use vault::{DEFAULT_KEY, Vault};
