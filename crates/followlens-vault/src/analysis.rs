//! The plaintext stored in the vault.

use followlens_core::{AssembledState, FollowMetrics, IngestWarning};
use serde::{Deserialize, Serialize};

/// A complete analysis result as persisted: `{ state, metrics, warnings }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAnalysis {
    pub state: AssembledState,
    pub metrics: FollowMetrics,
    #[serde(default)]
    pub warnings: Vec<IngestWarning>,
}

impl PersistedAnalysis {
    pub fn new(state: AssembledState, metrics: FollowMetrics, warnings: Vec<IngestWarning>) -> Self {
        Self {
            state,
            metrics,
            warnings,
        }
    }
}
