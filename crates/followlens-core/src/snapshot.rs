//! Lite snapshots and snapshot deltas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::RelationshipEntry;
use crate::state::AccountInfo;

/// Minimal projection of an analysis, kept as a comparison baseline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteSnapshot {
    /// Account the snapshot belongs to.
    #[serde(default)]
    pub account: AccountInfo,
    /// Follower usernames.
    #[serde(default)]
    pub followers: Vec<String>,
    /// Following usernames.
    #[serde(default)]
    pub following: Vec<String>,
    /// Mutual usernames, when supplied.
    ///
    /// `None` means the list was not recorded and must be recomputed;
    /// `Some(vec![])` means the snapshot genuinely had no mutuals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutuals: Option<Vec<String>>,
    /// When the export was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_date: Option<DateTime<Utc>>,
}

impl LiteSnapshot {
    /// Create a snapshot from follower and following usernames, without a mutual list.
    pub fn new(followers: Vec<String>, following: Vec<String>) -> Self {
        Self {
            followers,
            following,
            ..Self::default()
        }
    }

    /// Attach a mutual list.
    pub fn with_mutuals(mut self, mutuals: Vec<String>) -> Self {
        self.mutuals = Some(mutuals);
        self
    }
}

/// Entry-level and metric-level difference between two snapshots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    /// Followers present in the target but not the baseline.
    pub new_followers: Vec<RelationshipEntry>,
    /// Followers present in the baseline but not the target.
    pub lost_followers: Vec<RelationshipEntry>,
    /// Accounts followed in the target but not the baseline.
    pub new_following: Vec<RelationshipEntry>,
    /// Accounts followed in the baseline but not the target.
    pub unfollowed: Vec<RelationshipEntry>,
    /// Change in mutual count, target minus baseline.
    pub mutuals_delta: i64,
    /// Reciprocity rate of the baseline.
    pub reciprocity_before: f64,
    /// Reciprocity rate of the target.
    pub reciprocity_after: f64,
}

impl Delta {
    /// Check if the two snapshots had identical membership.
    pub fn is_unchanged(&self) -> bool {
        self.new_followers.is_empty()
            && self.lost_followers.is_empty()
            && self.new_following.is_empty()
            && self.unfollowed.is_empty()
    }
}
