//! Extracted dataset type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::RelationshipEntry;
use crate::kind::DatasetKind;

/// The typed result of classifying and extracting one export document.
///
/// Read-only once produced: fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDataset {
    kind: DatasetKind,
    entries: Vec<RelationshipEntry>,
    source_file: String,
    #[serde(default)]
    raw: Value,
}

impl ExtractedDataset {
    /// Create a dataset, tagging every entry with `kind`.
    pub fn new(
        kind: DatasetKind,
        entries: Vec<RelationshipEntry>,
        source_file: impl Into<String>,
        raw: Value,
    ) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| entry.with_source_kind(kind))
            .collect();
        Self {
            kind,
            entries,
            source_file: source_file.into(),
            raw,
        }
    }

    /// Kind the document was classified as.
    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Entries extracted from the document, deduplicated, in document order.
    pub fn entries(&self) -> &[RelationshipEntry] {
        &self.entries
    }

    /// Name of the file (or archive member) the document came from.
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// The parsed document.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Check if no entries were extracted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the raw document, keeping kind, entries and source name.
    pub fn without_raw(self) -> Self {
        Self {
            raw: Value::Null,
            ..self
        }
    }
}
