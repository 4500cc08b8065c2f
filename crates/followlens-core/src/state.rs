//! The assembled analysis state.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::dataset::ExtractedDataset;
use crate::entry::RelationshipEntry;
use crate::snapshot::{Delta, LiteSnapshot};

/// Account metadata attached to an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Account username, when the export names it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// When the export was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_date: Option<DateTime<Utc>>,
}

/// Follow-request buckets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestsBuckets {
    /// Pending requests the user sent.
    pub sent: Vec<RelationshipEntry>,
    /// Pending requests the user received.
    pub received: Vec<RelationshipEntry>,
    /// Recent follow requests.
    pub recent: Vec<RelationshipEntry>,
}

/// Privacy-related buckets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyBuckets {
    /// Restricted accounts.
    pub restricted: Vec<RelationshipEntry>,
    /// Accounts stories are hidden from.
    pub hide_story_from: Vec<RelationshipEntry>,
    /// Blocked accounts.
    pub blocked: Vec<RelationshipEntry>,
}

/// Baseline comparison attached to an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// The baseline the analysis was compared against.
    pub baseline: LiteSnapshot,
    /// Difference from the baseline to this analysis.
    pub delta: Delta,
}

/// Aggregate result of one ingestion call.
///
/// `mutuals`, `not_following_back` and `fans_you_dont_follow` are derived from
/// `followers`/`following` by the assembler; they are never computed elsewhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledState {
    /// Account metadata.
    pub account: AccountInfo,
    /// Normalized follower usernames, first-seen order.
    pub followers: IndexSet<String>,
    /// Normalized following usernames, first-seen order.
    pub following: IndexSet<String>,
    /// Followed accounts that follow back, sorted by username.
    pub mutuals: Vec<RelationshipEntry>,
    /// Followed accounts that do not follow back, sorted by username.
    pub not_following_back: Vec<RelationshipEntry>,
    /// Followers the user does not follow, sorted by username.
    pub fans_you_dont_follow: Vec<RelationshipEntry>,
    /// Follow-request buckets.
    pub requests: RequestsBuckets,
    /// Privacy buckets.
    pub privacy: PrivacyBuckets,
    /// Followed hashtags.
    pub hashtags: Vec<RelationshipEntry>,
    /// Recently unfollowed accounts.
    pub recently_unfollowed: Vec<RelationshipEntry>,
    /// Dismissed follow suggestions.
    pub dismissed_suggestions: Vec<RelationshipEntry>,
    /// Baseline comparison, when one was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare: Option<Comparison>,
    /// Every dataset that went into this state, in input order.
    #[serde(default)]
    pub files: Vec<ExtractedDataset>,
}

impl AssembledState {
    /// Check if the state holds no follower or following data.
    pub fn is_empty(&self) -> bool {
        self.followers.is_empty() && self.following.is_empty()
    }
}
