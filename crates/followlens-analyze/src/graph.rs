//! Follow-graph derivation and metrics.
//!
//! Given follower and following lists, derives:
//! - mutuals (`following ∩ followers`, entry taken from the following side)
//! - not following back (`following \ followers`)
//! - fans you don't follow (`followers \ following`)
//!
//! All three are keyed by normalized username and sorted by username so the
//! output is deterministic.

use indexmap::{IndexMap, IndexSet};

use followlens_core::{FollowMetrics, RelationshipEntry};

use crate::merge::index_entries;

/// Relationship lists derived from a follower/following pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedLists {
    /// Followed accounts that follow back.
    pub mutuals: Vec<RelationshipEntry>,
    /// Followed accounts that do not follow back.
    pub not_following_back: Vec<RelationshipEntry>,
    /// Followers the user does not follow.
    pub fans_you_dont_follow: Vec<RelationshipEntry>,
}

/// A built follow graph.
#[derive(Debug, Clone)]
pub struct FollowGraph {
    followers: IndexMap<String, RelationshipEntry>,
    following: IndexMap<String, RelationshipEntry>,
    derived: DerivedLists,
    metrics: FollowMetrics,
}

impl FollowGraph {
    /// Follower entries by normalized username, first-seen order.
    pub fn followers(&self) -> &IndexMap<String, RelationshipEntry> {
        &self.followers
    }

    /// Following entries by normalized username, first-seen order.
    pub fn following(&self) -> &IndexMap<String, RelationshipEntry> {
        &self.following
    }

    /// Normalized follower usernames.
    pub fn follower_set(&self) -> IndexSet<String> {
        self.followers.keys().cloned().collect()
    }

    /// Normalized following usernames.
    pub fn following_set(&self) -> IndexSet<String> {
        self.following.keys().cloned().collect()
    }

    /// Derived relationship lists.
    pub fn derived(&self) -> &DerivedLists {
        &self.derived
    }

    /// Follow metrics.
    pub fn metrics(&self) -> &FollowMetrics {
        &self.metrics
    }

    /// Consume the graph, returning the derived lists and metrics.
    pub fn into_parts(self) -> (IndexSet<String>, IndexSet<String>, DerivedLists, FollowMetrics) {
        let followers = self.followers.into_keys().collect();
        let following = self.following.into_keys().collect();
        (followers, following, self.derived, self.metrics)
    }
}

/// Build the follow graph from raw (possibly repeating) follower and following lists.
pub fn build_graph(followers: &[RelationshipEntry], following: &[RelationshipEntry]) -> FollowGraph {
    let followers = index_entries(followers);
    let following = index_entries(following);

    let mut derived = DerivedLists::default();

    for (key, entry) in &following {
        if followers.contains_key(key) {
            derived.mutuals.push(entry.clone());
        } else {
            derived.not_following_back.push(entry.clone());
        }
    }

    derived.fans_you_dont_follow = followers
        .iter()
        .filter(|(key, _)| !following.contains_key(*key))
        .map(|(_, entry)| entry.clone())
        .collect();

    sort_entries(&mut derived.mutuals);
    sort_entries(&mut derived.not_following_back);
    sort_entries(&mut derived.fans_you_dont_follow);

    let metrics = FollowMetrics::from_counts(
        followers.len(),
        following.len(),
        derived.mutuals.len(),
        derived.not_following_back.len(),
        derived.fans_you_dont_follow.len(),
    );

    FollowGraph {
        followers,
        following,
        derived,
        metrics,
    }
}

/// Sort by normalized username, then by display form for stability.
fn sort_entries(entries: &mut [RelationshipEntry]) {
    entries.sort_by_cached_key(|entry| (entry.key(), entry.username.clone()));
}
