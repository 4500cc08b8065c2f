//! User settings for the `flens` binary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings read from `settings.toml` in the platform config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Vault directory; unset uses the platform data directory.
    pub vault_dir: Option<PathBuf>,
    /// Logical key used when a vault command names none.
    pub default_key: String,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: None,
            default_key: followlens_vault::DEFAULT_KEY.to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("followlens").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| Self::parse(&content))
            .unwrap_or_default()
    }

    fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }
}
