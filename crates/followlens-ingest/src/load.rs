//! Input loading: ZIP archives and loose JSON documents.
//!
//! Each input yields a [`FileOutcome`]. Nothing in here fails: problems with a
//! file or archive member become warnings on the outcome and the rest of the
//! input is still processed.

use std::io::{Cursor, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde_json::Value;
use zip::ZipArchive;

use followlens_core::{DecodeError, ExtractedDataset, IngestConfig, IngestWarning};

use crate::classify::{classify_and_extract, dataset_warnings};

/// One input file handed to an ingestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFile {
    /// File name; its extension selects the decoder.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
    /// Modification time, if known.
    pub modified: Option<DateTime<Utc>>,
}

impl IngestFile {
    /// Create an input from a name and its contents.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            modified: None,
        }
    }

    /// Set the modification time.
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Read an input from disk, named after its file name.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let modified = tokio::fs::metadata(path)
            .await
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            bytes,
            modified,
        })
    }
}

/// Datasets and warnings produced by one input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOutcome {
    /// Datasets decoded from the input, in member order.
    pub datasets: Vec<ExtractedDataset>,
    /// Warnings raised while decoding the input.
    pub warnings: Vec<IngestWarning>,
    /// Newest modification time seen on the input or its members.
    pub latest_modified: Option<DateTime<Utc>>,
}

impl FileOutcome {
    fn warning(warning: IngestWarning) -> Self {
        Self {
            warnings: vec![warning],
            ..Self::default()
        }
    }

    /// Append another outcome, keeping order.
    pub fn extend(&mut self, other: FileOutcome) {
        self.datasets.extend(other.datasets);
        self.warnings.extend(other.warnings);
        self.latest_modified = self.latest_modified.max(other.latest_modified);
    }
}

/// Decode one input according to its extension.
pub fn process_file(file: IngestFile, config: &IngestConfig) -> FileOutcome {
    let lower = file.name.to_lowercase();
    let modified = file.modified;

    let mut outcome = if lower.ends_with(".zip") {
        process_archive(&file.name, &file.bytes, config)
    } else if lower.ends_with(".json") {
        decode_document(file.name, file.bytes, config)
    } else {
        FileOutcome::warning(IngestWarning::unsupported_file(file.name))
    };

    outcome.latest_modified = outcome.latest_modified.max(modified);
    outcome
}

/// Decode one JSON document and classify it.
pub fn decode_document(name: String, bytes: Vec<u8>, config: &IngestConfig) -> FileOutcome {
    match parse_json(&name, bytes, config.max_member_bytes) {
        Ok(json) => {
            let dataset = classify_and_extract(name, json);
            tracing::debug!(
                file = dataset.source_file(),
                kind = %dataset.kind(),
                entries = dataset.entries().len(),
                "classified document"
            );
            let warnings = dataset_warnings(&dataset);
            FileOutcome {
                datasets: vec![dataset],
                warnings,
                latest_modified: None,
            }
        }
        Err(err) => FileOutcome::warning(err.into_warning()),
    }
}

fn parse_json(name: &str, bytes: Vec<u8>, limit: u64) -> Result<Value, DecodeError> {
    if bytes.len() as u64 > limit {
        return Err(DecodeError::TooLarge {
            file: name.to_string(),
            limit,
        });
    }
    let text = String::from_utf8(bytes).map_err(|source| DecodeError::Utf8 {
        file: name.to_string(),
        source,
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    serde_json::from_str(text).map_err(|source| DecodeError::Json {
        file: name.to_string(),
        source,
    })
}

/// A JSON member read out of an archive.
struct Member {
    name: String,
    bytes: Vec<u8>,
    modified: Option<DateTime<Utc>>,
}

/// Decode every `.json` member of a ZIP archive.
///
/// Members are read sequentially in batches of one per rayon thread, and each
/// batch is parsed and classified in parallel before the next is read, so at
/// most one batch of member bytes is held at a time. The outcome keeps archive
/// order.
pub fn process_archive(name: &str, bytes: &[u8], config: &IngestConfig) -> FileOutcome {
    let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(err) => return FileOutcome::warning(DecodeError::archive(name, err).into_warning()),
    };

    let batch_size = rayon::current_num_threads().max(1);
    let mut indices = 0..archive.len();
    let mut combined = FileOutcome::default();
    let mut member_count = 0;

    loop {
        let batch: Vec<Result<Member, DecodeError>> = indices
            .by_ref()
            .filter_map(|index| read_member(&mut archive, name, index, config.max_member_bytes))
            .take(batch_size)
            .collect();
        if batch.is_empty() {
            break;
        }
        member_count += batch.len();

        let outcomes: Vec<FileOutcome> = batch
            .into_par_iter()
            .map(|member| match member {
                Ok(member) => {
                    let mut outcome = decode_document(member.name, member.bytes, config);
                    outcome.latest_modified = member.modified;
                    outcome
                }
                Err(err) => FileOutcome::warning(err.into_warning()),
            })
            .collect();
        for outcome in outcomes {
            combined.extend(outcome);
        }
    }

    tracing::debug!(archive = name, members = member_count, "read archive");
    combined
}

/// Read one member; `None` for directories and non-JSON members.
fn read_member(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    archive_name: &str,
    index: usize,
    limit: u64,
) -> Option<Result<Member, DecodeError>> {
    let mut entry = match archive.by_index(index) {
        Ok(entry) => entry,
        Err(err) => return Some(Err(DecodeError::archive(archive_name, err))),
    };
    if entry.is_dir() || !entry.name().to_lowercase().ends_with(".json") {
        return None;
    }

    let name = entry.name().to_string();
    let modified = entry.last_modified().and_then(zip_time_to_utc);

    let mut bytes = Vec::new();
    if let Err(source) = entry.by_ref().take(limit.saturating_add(1)).read_to_end(&mut bytes) {
        return Some(Err(DecodeError::Io { file: name, source }));
    }
    if bytes.len() as u64 > limit {
        return Some(Err(DecodeError::TooLarge { file: name, limit }));
    }

    Some(Ok(Member {
        name,
        bytes,
        modified,
    }))
}

/// ZIP timestamps carry no zone; they are read as UTC.
fn zip_time_to_utc(time: zip::DateTime) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(time.year().into(), time.month().into(), time.day().into())?
        .and_hms_opt(time.hour().into(), time.minute().into(), time.second().into())
        .map(|naive| naive.and_utc())
}
