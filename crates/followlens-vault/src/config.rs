//! Vault configuration.

use std::path::PathBuf;

use derive_builder::Builder;

use crate::crypto::DEFAULT_ITERATIONS;
use crate::error::{VaultError, VaultResult};

/// Default namespace prefixed to every logical key.
pub const DEFAULT_NAMESPACE: &str = "followlens:encrypted";

/// Configuration for a [`crate::Vault`].
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct VaultConfig {
    /// Store directory; `None` uses the platform data directory.
    #[builder(default)]
    pub root: Option<PathBuf>,

    /// Namespace prefixed to logical keys.
    #[builder(default = "DEFAULT_NAMESPACE.to_string()")]
    pub namespace: String,

    /// PBKDF2 iteration count.
    #[builder(default = "DEFAULT_ITERATIONS")]
    pub iterations: u32,
}

impl VaultConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.iterations == Some(0) {
            return Err("iterations must be greater than zero".to_string());
        }
        if let Some(namespace) = &self.namespace {
            if namespace.trim().is_empty() {
                return Err("namespace cannot be blank".to_string());
            }
        }
        Ok(())
    }
}

impl VaultConfig {
    /// Create a new config builder.
    pub fn builder() -> VaultConfigBuilder {
        VaultConfigBuilder::default()
    }

    /// The store directory, resolving the platform default when unset.
    pub fn resolved_root(&self) -> VaultResult<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("followlens").join("vault"))
            .ok_or_else(|| VaultError::StorageUnavailable {
                path: PathBuf::new(),
                message: "no platform data directory".to_string(),
            })
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            iterations: DEFAULT_ITERATIONS,
        }
    }
}
