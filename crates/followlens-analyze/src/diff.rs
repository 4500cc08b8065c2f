//! Snapshot diffing.

use indexmap::{IndexMap, IndexSet};

use followlens_core::{Delta, LiteSnapshot, RelationshipEntry, normalize_username, rate};

/// Compute the delta from `baseline` to `target`.
///
/// Added entries use the target's casing, removed entries the baseline's.
/// `mutuals_delta` is always recomputed from the follower and following lists.
/// The reciprocity rates trust a snapshot's stored mutual list when it has
/// one (even an empty one) and recompute the intersection otherwise.
pub fn diff(baseline: &LiteSnapshot, target: &LiteSnapshot) -> Delta {
    let (new_followers, lost_followers) = added_removed(&baseline.followers, &target.followers);
    let (new_following, unfollowed) = added_removed(&baseline.following, &target.following);

    let mutuals_before = mutual_count(&baseline.followers, &baseline.following);
    let mutuals_after = mutual_count(&target.followers, &target.following);

    Delta {
        new_followers,
        lost_followers,
        new_following,
        unfollowed,
        mutuals_delta: mutuals_after as i64 - mutuals_before as i64,
        reciprocity_before: reciprocity(baseline),
        reciprocity_after: reciprocity(target),
    }
}

/// Number of distinct normalized usernames present in both lists.
pub fn mutual_count(followers: &[String], following: &[String]) -> usize {
    let followers = keys(followers);
    keys(following)
        .iter()
        .filter(|key| followers.contains(*key))
        .count()
}

fn reciprocity(snapshot: &LiteSnapshot) -> f64 {
    let following = keys(&snapshot.following).len();
    let mutuals = match &snapshot.mutuals {
        Some(mutuals) => keys(mutuals).len(),
        None => mutual_count(&snapshot.followers, &snapshot.following),
    };
    rate(mutuals, following)
}

fn keys(names: &[String]) -> IndexSet<String> {
    names.iter().map(|name| normalize_username(name)).collect()
}

/// First-seen display form per normalized username.
fn by_key(names: &[String]) -> IndexMap<String, &str> {
    let mut map = IndexMap::new();
    for name in names {
        map.entry(normalize_username(name)).or_insert(name.as_str());
    }
    map
}

fn added_removed(
    before: &[String],
    after: &[String],
) -> (Vec<RelationshipEntry>, Vec<RelationshipEntry>) {
    let before = by_key(before);
    let after = by_key(after);

    let added = after
        .iter()
        .filter(|(key, _)| !before.contains_key(*key))
        .map(|(_, name)| RelationshipEntry::new(*name))
        .collect();
    let removed = before
        .iter()
        .filter(|(key, _)| !after.contains_key(*key))
        .map(|(_, name)| RelationshipEntry::new(*name))
        .collect();

    (added, removed)
}
