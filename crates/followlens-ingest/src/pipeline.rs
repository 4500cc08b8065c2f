//! The ingestion pipeline: load, classify, assemble.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use followlens_analyze::{Assembly, assemble, attach_comparison};
use followlens_core::{
    AssembledState, FollowMetrics, IngestConfig, IngestWarning, LiteSnapshot,
};

use crate::account::extract_account;
use crate::load::{FileOutcome, IngestFile, process_file};

/// One ingestion call's input.
#[derive(Debug, Clone, Default)]
pub struct IngestRequest {
    /// Inputs in the order they should be processed.
    pub files: Vec<IngestFile>,
    /// Baseline to compare the result against.
    pub baseline: Option<LiteSnapshot>,
}

impl IngestRequest {
    /// Create a request for the given inputs.
    pub fn new(files: Vec<IngestFile>) -> Self {
        Self {
            files,
            baseline: None,
        }
    }

    /// Compare the result against a baseline snapshot.
    pub fn with_baseline(mut self, baseline: LiteSnapshot) -> Self {
        self.baseline = Some(baseline);
        self
    }
}

/// One ingestion call's result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    /// The assembled state.
    pub state: AssembledState,
    /// Metrics of the state's follow graph.
    pub metrics: FollowMetrics,
    /// Non-fatal problems met along the way, in input order.
    pub warnings: Vec<IngestWarning>,
}

/// Run the whole pipeline synchronously.
pub fn ingest_files(request: IngestRequest, config: &IngestConfig) -> IngestResponse {
    run(request, config, &CancellationToken::new(), &mut Vec::new()).unwrap_or_default()
}

/// Run the pipeline, checking `cancel` between inputs.
///
/// Warnings are collected into `gathered` as each input is processed, so the
/// caller still holds them if the run dies part way. On success they are
/// moved into the response.
///
/// Returns `None` once cancelled; no partial result is produced.
pub(crate) fn run(
    request: IngestRequest,
    config: &IngestConfig,
    cancel: &CancellationToken,
    gathered: &mut Vec<IngestWarning>,
) -> Option<IngestResponse> {
    let file_count = request.files.len();
    let mut combined = FileOutcome::default();

    for file in request.files {
        if cancel.is_cancelled() {
            return None;
        }
        let mut outcome = process_file(file, config);
        gathered.append(&mut outcome.warnings);
        combined.extend(outcome);
    }

    let FileOutcome {
        datasets,
        latest_modified,
        ..
    } = combined;

    let mut account = extract_account(&datasets, latest_modified, Utc::now());
    if let Some(username) = &config.account_username {
        account.username = Some(username.trim().to_string());
    }

    let datasets = if config.include_raw {
        datasets
    } else {
        datasets.into_iter().map(|d| d.without_raw()).collect()
    };

    if cancel.is_cancelled() {
        return None;
    }

    let Assembly { mut state, metrics } = assemble(datasets, account);
    let warnings = std::mem::take(gathered);
    if let Some(baseline) = request.baseline {
        attach_comparison(&mut state, baseline);
    }

    for warning in &warnings {
        tracing::warn!(file = %warning.file, kind = ?warning.kind, "{}", warning.message);
    }
    tracing::info!(
        files = file_count,
        datasets = state.files.len(),
        warnings = warnings.len(),
        followers = metrics.followers_count,
        following = metrics.following_count,
        "ingestion finished"
    );

    Some(IngestResponse {
        state,
        metrics,
        warnings,
    })
}
