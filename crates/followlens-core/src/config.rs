//! Ingestion configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for ingestion calls.
///
/// Deserialization goes through the validated builder, so a config read from
/// a file is held to the same rules as one built in code.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[builder_struct_attr(derive(Deserialize))]
#[serde(try_from = "IngestConfigBuilder")]
pub struct IngestConfig {
    /// Maximum decompressed size of a single JSON document, in bytes.
    #[builder(default = "64 * 1024 * 1024")]
    pub max_member_bytes: u64,

    /// Account username to use instead of the one found in the export.
    #[builder(default)]
    pub account_username: Option<String>,

    /// Keep each dataset's parsed document on the assembled state.
    #[builder(default = "true")]
    pub include_raw: bool,

    /// Capacity of a session's request queue.
    #[builder(default = "4")]
    pub channel_size: usize,
}

impl IngestConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_member_bytes == Some(0) {
            return Err("max_member_bytes must be greater than zero".to_string());
        }
        if self.channel_size == Some(0) {
            return Err("channel_size must be greater than zero".to_string());
        }
        if let Some(Some(username)) = &self.account_username {
            if username.trim().is_empty() {
                return Err("account_username cannot be blank".to_string());
            }
        }
        Ok(())
    }
}

impl TryFrom<IngestConfigBuilder> for IngestConfig {
    type Error = IngestConfigBuilderError;

    fn try_from(builder: IngestConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl IngestConfig {
    /// Create a new config builder.
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_member_bytes: 64 * 1024 * 1024,
            account_username: None,
            include_raw: true,
            channel_size: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = IngestConfig::builder()
            .max_member_bytes(1024u64)
            .account_username(Some("jane".to_string()))
            .include_raw(false)
            .build()
            .unwrap();

        assert_eq!(config.max_member_bytes, 1024);
        assert_eq!(config.account_username.as_deref(), Some("jane"));
        assert!(!config.include_raw);
        assert_eq!(config.channel_size, 4);
    }

    #[test]
    fn test_config_builder_rejects_zero_limit() {
        let result = IngestConfig::builder().max_member_bytes(0u64).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder_rejects_blank_username() {
        let result = IngestConfig::builder()
            .account_username(Some("  ".to_string()))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_defaults_match_builder() {
        assert_eq!(IngestConfig::default(), IngestConfig::builder().build().unwrap());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: IngestConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, IngestConfig::default());

        let config: IngestConfig =
            serde_json::from_str(r#"{"channel_size": 8, "include_raw": false}"#).unwrap();
        assert_eq!(config.channel_size, 8);
        assert!(!config.include_raw);
    }

    #[test]
    fn test_config_deserialization_is_validated() {
        let err = serde_json::from_str::<IngestConfig>(r#"{"channel_size": 0}"#).unwrap_err();
        assert!(err.to_string().contains("channel_size"));

        assert!(serde_json::from_str::<IngestConfig>(r#"{"max_member_bytes": 0}"#).is_err());
        assert!(serde_json::from_str::<IngestConfig>(r#"{"account_username": " "}"#).is_err());
    }
}
