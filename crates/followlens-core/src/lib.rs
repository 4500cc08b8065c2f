//! Core types for followlens.
//!
//! This crate provides the data model shared by every other followlens crate:
//! relationship entries and the handles they are keyed by, the closed set of
//! dataset kinds an export file can be classified as, the assembled analysis
//! state, lite snapshots and deltas, warnings and errors, and configuration.
//!
//! Nothing in here performs I/O.

mod config;
mod dataset;
mod entry;
mod error;
pub mod handle;
pub mod kind;
mod metrics;
mod snapshot;
mod state;

pub use config::{IngestConfig, IngestConfigBuilder};
pub use dataset::ExtractedDataset;
pub use entry::RelationshipEntry;
pub use error::{DecodeError, IngestError, IngestWarning, WarningKind};
pub use handle::{is_valid_handle, normalize_username};
pub use kind::DatasetKind;
pub use metrics::{FollowMetrics, rate, round4};
pub use snapshot::{Delta, LiteSnapshot};
pub use state::{AccountInfo, AssembledState, Comparison, PrivacyBuckets, RequestsBuckets};
