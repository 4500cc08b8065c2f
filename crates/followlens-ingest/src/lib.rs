//! Export ingestion for followlens.
//!
//! This crate turns raw export files into an analysis:
//!
//! - **Loading** - ZIP archives and loose JSON documents, with per-member size limits
//! - **Classification** - Dataset kind detection and entry extraction
//! - **Account info** - Username and snapshot date from the profile document
//! - **Sessions** - An owned background worker running one call at a time
//!
//! # Example
//!
//! ```rust,no_run
//! use followlens_ingest::{IngestFile, IngestRequest, IngestSession};
//! use followlens_core::IngestConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = IngestSession::new(IngestConfig::default());
//! let file = IngestFile::from_path("instagram-export.zip").await?;
//!
//! let response = session.ingest(IngestRequest::new(vec![file])).await?;
//! println!("{} mutuals", response.metrics.mutual_count);
//!
//! session.terminate().await;
//! # Ok(())
//! # }
//! ```

mod account;
pub mod classify;
mod load;
mod pipeline;
mod session;

pub use account::extract_account;
pub use classify::{classify, classify_and_extract, extract_entries, username_from_href};
pub use load::{FileOutcome, IngestFile, decode_document, process_archive, process_file};
pub use pipeline::{IngestRequest, IngestResponse, ingest_files};
pub use session::{IngestSession, SessionTerminator};
