//! Vault error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from encrypted persistence.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The platform cannot provide the required cryptographic primitives.
    #[error("Cryptography unavailable: {message}")]
    CryptoUnavailable { message: String },

    /// Wrong passphrase, or the payload was corrupted or tampered with.
    #[error("Could not decrypt: wrong passphrase or corrupted payload")]
    DecryptionAuthFailure,

    /// No persistent store is reachable.
    #[error("Storage unavailable at {}: {message}", path.display())]
    StorageUnavailable { path: PathBuf, message: String },

    /// Nothing is stored under the key.
    #[error("No stored analysis under key '{key}'")]
    NotFound { key: String },

    /// The stored payload is not a valid envelope.
    #[error("Malformed payload under key '{key}': {message}")]
    MalformedPayload { key: String, message: String },

    /// The stored payload uses an unknown format version.
    #[error("Unsupported payload version {version} under key '{key}'")]
    UnsupportedVersion { key: String, version: u32 },

    /// The plaintext could not be (de)serialized.
    #[error("Serialization error: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// I/O error on the backing store.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VaultError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a crypto-unavailable error.
    pub fn crypto(message: impl ToString) -> Self {
        Self::CryptoUnavailable {
            message: message.to_string(),
        }
    }

    /// Check if this is an authentication failure the caller may retry.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::DecryptionAuthFailure)
    }
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;
