//! State assembly.

use followlens_core::{
    AccountInfo, AssembledState, Comparison, DatasetKind, ExtractedDataset, FollowMetrics,
    LiteSnapshot, PrivacyBuckets, RequestsBuckets,
};

use crate::diff::diff;
use crate::graph::build_graph;
use crate::merge::merge_datasets;

/// Result of assembling a set of datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// The assembled state.
    pub state: AssembledState,
    /// Metrics of the follow graph in `state`.
    pub metrics: FollowMetrics,
}

/// Assemble extracted datasets into a single analysis state.
///
/// Every bucket is filled from the merged datasets of its kind, or left empty
/// when no dataset of that kind was supplied. The datasets themselves are kept
/// on the state in input order.
pub fn assemble(datasets: Vec<ExtractedDataset>, account: AccountInfo) -> Assembly {
    let mut merged = merge_datasets(&datasets);

    let followers = merged.take(DatasetKind::Followers);
    let following = merged.take(DatasetKind::Following);
    let graph = build_graph(&followers, &following);
    let (followers, following, derived, metrics) = graph.into_parts();

    tracing::debug!(
        datasets = datasets.len(),
        followers = metrics.followers_count,
        following = metrics.following_count,
        mutuals = metrics.mutual_count,
        "assembled follow graph"
    );

    let state = AssembledState {
        account,
        followers,
        following,
        mutuals: derived.mutuals,
        not_following_back: derived.not_following_back,
        fans_you_dont_follow: derived.fans_you_dont_follow,
        requests: RequestsBuckets {
            sent: merged.take(DatasetKind::PendingSentRequests),
            received: merged.take(DatasetKind::PendingReceivedRequests),
            recent: merged.take(DatasetKind::RecentRequests),
        },
        privacy: PrivacyBuckets {
            restricted: merged.take(DatasetKind::Restricted),
            hide_story_from: merged.take(DatasetKind::HideStoryFrom),
            blocked: merged.take(DatasetKind::Blocked),
        },
        hashtags: merged.take(DatasetKind::Hashtags),
        recently_unfollowed: merged.take(DatasetKind::RecentlyUnfollowed),
        dismissed_suggestions: merged.take(DatasetKind::DismissedSuggestions),
        compare: None,
        files: datasets,
    };

    Assembly { state, metrics }
}

/// Project a state down to a lite snapshot.
///
/// Follower and following lists hold normalized usernames in first-seen order;
/// the mutual list holds display usernames and is always present.
pub fn project(state: &AssembledState) -> LiteSnapshot {
    LiteSnapshot {
        account: state.account.clone(),
        followers: state.followers.iter().cloned().collect(),
        following: state.following.iter().cloned().collect(),
        mutuals: Some(state.mutuals.iter().map(|e| e.username.clone()).collect()),
        snapshot_date: state.account.snapshot_date,
    }
}

/// Compare a state against a baseline snapshot and record the result on the state.
pub fn attach_comparison(state: &mut AssembledState, baseline: LiteSnapshot) {
    let delta = diff(&baseline, &project(state));
    tracing::debug!(
        new_followers = delta.new_followers.len(),
        lost_followers = delta.lost_followers.len(),
        "compared against baseline"
    );
    state.compare = Some(Comparison { baseline, delta });
}
