//! Error and warning types for ingestion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single input (file or archive member) could not be decoded.
///
/// Decode errors never abort an ingestion call; they are turned into
/// [`IngestWarning`]s with [`DecodeError::into_warning`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document is not valid JSON.
    #[error("Could not parse JSON: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document is not valid UTF-8.
    #[error("File is not valid UTF-8: {source}")]
    Utf8 {
        file: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The archive could not be opened or a member could not be read.
    #[error("Could not read archive: {message}")]
    Archive { file: String, message: String },

    /// The input exceeds the configured size limit.
    #[error("File exceeds the size limit of {limit} bytes")]
    TooLarge { file: String, limit: u64 },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

impl DecodeError {
    /// Create an archive error.
    pub fn archive(file: impl Into<String>, message: impl ToString) -> Self {
        Self::Archive {
            file: file.into(),
            message: message.to_string(),
        }
    }

    /// Name of the input that failed.
    pub fn file(&self) -> &str {
        match self {
            Self::Json { file, .. }
            | Self::Utf8 { file, .. }
            | Self::Archive { file, .. }
            | Self::TooLarge { file, .. }
            | Self::Io { file, .. } => file,
        }
    }

    /// Convert into a non-fatal warning.
    pub fn into_warning(self) -> IngestWarning {
        IngestWarning::new(self.file().to_string(), self.to_string(), WarningKind::Decode)
    }
}

/// Terminal failure of an ingestion call.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The session was terminated while the call was in flight, or before it started.
    #[error("Ingestion session was terminated")]
    SessionTerminated,

    /// The session's worker is no longer running.
    #[error("Ingestion session is no longer running")]
    SessionClosed,

    /// The pipeline failed as a whole.
    #[error("Ingestion failed: {message}")]
    Failed {
        message: String,
        warnings: Vec<IngestWarning>,
    },
}

impl IngestError {
    /// Warnings gathered before the failure.
    pub fn warnings(&self) -> &[IngestWarning] {
        match self {
            Self::Failed { warnings, .. } => warnings,
            _ => &[],
        }
    }
}

/// Kind of ingestion warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A file or archive member could not be decoded.
    #[default]
    Decode,
    /// A document could not be classified.
    UnknownKind,
    /// A document of a recognized kind yielded no entries.
    EmptyDataset,
    /// An input is neither an archive nor a JSON document.
    UnsupportedFile,
}

/// Non-fatal warning encountered during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestWarning {
    /// File or archive member the warning refers to.
    pub file: String,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    #[serde(default)]
    pub kind: WarningKind,
}

impl IngestWarning {
    /// Create a new warning.
    pub fn new(file: impl Into<String>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create an unknown-kind warning.
    pub fn unknown_kind(file: impl Into<String>) -> Self {
        Self::new(
            file,
            "File has no recognized category; use the files from the followers_and_following folder",
            WarningKind::UnknownKind,
        )
    }

    /// Create an empty-dataset warning.
    pub fn empty_dataset(file: impl Into<String>) -> Self {
        Self::new(
            file,
            "No users were found in this file; check it is an unmodified export",
            WarningKind::EmptyDataset,
        )
    }

    /// Create an unsupported-file warning.
    pub fn unsupported_file(file: impl Into<String>) -> Self {
        Self::new(
            file,
            "Unsupported file type; use the ZIP or JSON files of the export",
            WarningKind::UnsupportedFile,
        )
    }
}
