use std::collections::BTreeSet;

use followlens_analyze::{
    Assembly, assemble, attach_comparison, build_graph, diff, merge_datasets, project,
};
use followlens_core::{
    AccountInfo, DatasetKind, ExtractedDataset, LiteSnapshot, RelationshipEntry,
    normalize_username,
};
use proptest::prelude::*;
use serde_json::Value;

fn dataset(kind: DatasetKind, file: &str, names: &[&str]) -> ExtractedDataset {
    let entries = names.iter().map(|name| RelationshipEntry::new(*name)).collect();
    ExtractedDataset::new(kind, entries, file, Value::Null)
}

fn entries(names: &[String]) -> Vec<RelationshipEntry> {
    names.iter().map(|name| RelationshipEntry::new(name.as_str())).collect()
}

fn key_set(entries: &[RelationshipEntry]) -> BTreeSet<String> {
    entries.iter().map(RelationshipEntry::key).collect()
}

#[test]
fn test_multi_part_followers_merge() {
    let datasets = vec![
        dataset(DatasetKind::Followers, "followers_1.json", &["Alice", "bob"]),
        dataset(DatasetKind::Followers, "followers_2.json", &["@ALICE", "carol"]),
        dataset(DatasetKind::Following, "following.json", &["alice", "dave"]),
    ];

    let Assembly { state, metrics } = assemble(datasets, AccountInfo::default());

    assert_eq!(metrics.followers_count, 3);
    assert_eq!(metrics.following_count, 2);
    assert_eq!(metrics.mutual_count, 1);
    assert_eq!(metrics.reciprocity_rate, 0.5);
    assert_eq!(metrics.follow_back_rate, 0.3333);

    assert_eq!(state.followers.iter().collect::<Vec<_>>(), ["alice", "bob", "carol"]);
    assert_eq!(state.mutuals[0].username, "alice");
    assert_eq!(state.mutuals[0].source_kind, Some(DatasetKind::Following));
    assert_eq!(state.not_following_back[0].username, "dave");
    assert_eq!(state.files.len(), 3);
}

#[test]
fn test_merge_preserves_first_display_form() {
    let first = dataset(DatasetKind::Blocked, "blocked_1.json", &["@Spam.Bot"]);
    let second = dataset(DatasetKind::Blocked, "blocked_2.json", &["spam.bot"]);

    let merged = merge_datasets([&first, &second]);
    let blocked = merged.get(DatasetKind::Blocked);
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].username, "@Spam.Bot");
}

#[test]
fn test_state_serializes_camel_case() {
    let datasets = vec![
        dataset(DatasetKind::Followers, "followers_1.json", &["a"]),
        dataset(DatasetKind::HideStoryFrom, "hide_story_from.json", &["b"]),
    ];
    let Assembly { state, .. } = assemble(datasets, AccountInfo::default());

    let json = serde_json::to_value(&state).unwrap();
    assert!(json.get("notFollowingBack").is_some());
    assert!(json.get("fansYouDontFollow").is_some());
    assert_eq!(json["privacy"]["hideStoryFrom"][0]["username"], "b");
    assert_eq!(json["privacy"]["hideStoryFrom"][0]["source"], "hide_story");
    assert!(json.get("compare").is_none());
}

#[test]
fn test_comparison_against_previous_projection() {
    let before = vec![
        dataset(DatasetKind::Followers, "followers_1.json", &["a", "b"]),
        dataset(DatasetKind::Following, "following.json", &["a", "b"]),
    ];
    let Assembly { state: previous, .. } = assemble(before, AccountInfo::default());
    let baseline = project(&previous);

    let after = vec![
        dataset(DatasetKind::Followers, "followers_1.json", &["b", "c"]),
        dataset(DatasetKind::Following, "following.json", &["a", "b", "c"]),
    ];
    let Assembly { mut state, .. } = assemble(after, AccountInfo::default());
    attach_comparison(&mut state, baseline);

    let delta = state.compare.unwrap().delta;
    assert_eq!(key_set(&delta.new_followers), BTreeSet::from(["c".to_string()]));
    assert_eq!(key_set(&delta.lost_followers), BTreeSet::from(["a".to_string()]));
    assert_eq!(key_set(&delta.new_following), BTreeSet::from(["c".to_string()]));
    assert!(delta.unfollowed.is_empty());
    assert_eq!(delta.mutuals_delta, 0);
    assert_eq!(delta.reciprocity_before, 1.0);
    assert_eq!(delta.reciprocity_after, 0.6667);
}

#[test]
fn test_lite_snapshot_roundtrips_presence_marker() {
    let snapshot = LiteSnapshot::new(vec!["a".into()], vec!["a".into()]).with_mutuals(Vec::new());
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: LiteSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.mutuals, Some(Vec::new()));
    assert_eq!(diff(&back, &back).reciprocity_before, 0.0);
}

fn arb_handle() -> impl Strategy<Value = String> {
    // Small alphabet so the two sides overlap often
    "@?[a-dA-D]{1,2}"
}

fn arb_handles() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_handle(), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn graph_partitions_following(followers in arb_handles(), following in arb_handles()) {
        let graph = build_graph(&entries(&followers), &entries(&following));
        let derived = graph.derived();

        let follower_keys: BTreeSet<String> = followers.iter().map(|n| normalize_username(n)).collect();
        let following_keys: BTreeSet<String> = following.iter().map(|n| normalize_username(n)).collect();

        let mutuals = key_set(&derived.mutuals);
        let nfb = key_set(&derived.not_following_back);
        let fans = key_set(&derived.fans_you_dont_follow);

        let both: BTreeSet<String> = following_keys.intersection(&follower_keys).cloned().collect();
        let one_way: BTreeSet<String> = following_keys.difference(&follower_keys).cloned().collect();
        let fans_expected: BTreeSet<String> = follower_keys.difference(&following_keys).cloned().collect();

        prop_assert_eq!(mutuals, both);
        prop_assert_eq!(nfb, one_way);
        prop_assert_eq!(fans, fans_expected);

        let metrics = graph.metrics();
        prop_assert_eq!(metrics.mutual_count + metrics.not_following_back_count, metrics.following_count);
        prop_assert_eq!(metrics.mutual_count + metrics.fans_you_dont_follow_count, metrics.followers_count);
        prop_assert!((0.0..=1.0).contains(&metrics.reciprocity_rate));
        prop_assert!((0.0..=1.0).contains(&metrics.follow_back_rate));
    }

    #[test]
    fn graph_lists_are_sorted(followers in arb_handles(), following in arb_handles()) {
        let graph = build_graph(&entries(&followers), &entries(&following));
        for list in [
            &graph.derived().mutuals,
            &graph.derived().not_following_back,
            &graph.derived().fans_you_dont_follow,
        ] {
            let keys: Vec<String> = list.iter().map(RelationshipEntry::key).collect();
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(keys, sorted);
        }
    }

    #[test]
    fn diff_against_self_is_empty(followers in arb_handles(), following in arb_handles()) {
        let snapshot = LiteSnapshot::new(followers, following);
        let delta = diff(&snapshot, &snapshot);
        prop_assert!(delta.is_unchanged());
        prop_assert_eq!(delta.mutuals_delta, 0);
        prop_assert_eq!(delta.reciprocity_before, delta.reciprocity_after);
    }

    #[test]
    fn diff_is_symmetric(a in arb_handles(), b in arb_handles()) {
        let left = LiteSnapshot::new(a, Vec::new());
        let right = LiteSnapshot::new(b, Vec::new());

        let forward = diff(&left, &right);
        let backward = diff(&right, &left);
        prop_assert_eq!(key_set(&forward.new_followers), key_set(&backward.lost_followers));
        prop_assert_eq!(key_set(&forward.lost_followers), key_set(&backward.new_followers));
    }

    #[test]
    fn merge_is_unique_per_key(names in arb_handles()) {
        let ds = ExtractedDataset::new(DatasetKind::Following, entries(&names), "following.json", Value::Null);
        let merged = merge_datasets([&ds, &ds]);
        let list = merged.get(DatasetKind::Following);
        prop_assert_eq!(list.len(), key_set(list).len());
    }
}
