//! Relationship entry type.

use serde::{Deserialize, Serialize};

use crate::handle::normalize_username;
use crate::kind::DatasetKind;

/// A single account (or hashtag) appearing in an export dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEntry {
    /// Username as it appeared in the export, original casing preserved.
    pub username: String,
    /// Display title attached to the record, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Profile link attached to the record, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Unix timestamp (seconds) attached to the record, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Kind of dataset this entry was extracted from.
    #[serde(
        default,
        rename = "source",
        alias = "sourceKind",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_kind: Option<DatasetKind>,
}

impl RelationshipEntry {
    /// Create an entry carrying only a username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            display_name: None,
            href: None,
            timestamp: None,
            source_kind: None,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    /// Set the profile link.
    pub fn with_href(mut self, href: Option<String>) -> Self {
        self.href = href;
        self
    }

    /// Set the timestamp.
    pub fn with_timestamp(mut self, timestamp: Option<i64>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Tag the entry with the kind of dataset it came from.
    pub fn with_source_kind(mut self, kind: DatasetKind) -> Self {
        self.source_kind = Some(kind);
        self
    }

    /// The normalized join/dedup key for this entry.
    pub fn key(&self) -> String {
        normalize_username(&self.username)
    }
}
