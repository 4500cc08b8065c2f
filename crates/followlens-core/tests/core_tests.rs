use followlens_core::kind::{KIND_RULES, kind_from_file_name};
use followlens_core::{
    AssembledState, DatasetKind, ExtractedDataset, IngestConfig, RelationshipEntry,
    is_valid_handle, normalize_username,
};
use proptest::prelude::*;
use serde_json::json;
use strum::IntoEnumIterator;

#[test]
fn test_handle_examples() {
    assert_eq!(normalize_username("@Jane_Doe"), "jane_doe");
    assert!(is_valid_handle("@Jane_Doe"));
    assert!(!is_valid_handle("https://x.com/user"));
    assert!(!is_valid_handle("#"));
    assert!(is_valid_handle("#travel"));
    assert_eq!(normalize_username("#travel"), "travel");
}

#[test]
fn test_every_known_kind_has_a_rule() {
    for kind in DatasetKind::known() {
        assert!(kind.rule().is_some(), "{kind} has no rule");
        assert!(!kind.json_keys().is_empty());
    }
    assert!(DatasetKind::Unknown.rule().is_none());
    assert_eq!(KIND_RULES.len(), DatasetKind::iter().count() - 1);
}

#[test]
fn test_export_file_names() {
    let cases = [
        ("followers_1.json", DatasetKind::Followers),
        ("followers_2.json", DatasetKind::Followers),
        ("following.json", DatasetKind::Following),
        ("following_hashtags.json", DatasetKind::Hashtags),
        ("pending_follow_requests_sent.json", DatasetKind::PendingSentRequests),
        ("recent_follow_requests.json", DatasetKind::RecentRequests),
        ("restricted_profiles.json", DatasetKind::Restricted),
        ("hide_story_from.json", DatasetKind::HideStoryFrom),
        ("blocked_profiles.json", DatasetKind::Blocked),
        ("recently_unfollowed_profiles.json", DatasetKind::RecentlyUnfollowed),
        ("removed_suggestions.json", DatasetKind::DismissedSuggestions),
        ("profile_information.json", DatasetKind::ProfileInformation),
    ];
    for (name, expected) in cases {
        assert_eq!(kind_from_file_name(name), Some(expected), "{name}");
    }
    assert_eq!(kind_from_file_name("close_friends.json"), None);
}

#[test]
fn test_dataset_serializes_for_traceability() {
    let dataset = ExtractedDataset::new(
        DatasetKind::Blocked,
        vec![RelationshipEntry::new("troll")],
        "blocked_profiles.json",
        json!({"relationships_blocked_users": []}),
    );
    let json = serde_json::to_value(&dataset).unwrap();
    assert_eq!(json["kind"], "blocked");
    assert_eq!(json["sourceFile"], "blocked_profiles.json");
    assert_eq!(json["entries"][0]["source"], "blocked");

    let state = AssembledState {
        files: vec![dataset.without_raw()],
        ..AssembledState::default()
    };
    let back: AssembledState = serde_json::from_value(serde_json::to_value(&state).unwrap()).unwrap();
    assert_eq!(back, state);
}

#[test]
fn test_ingest_config_from_toml_like_json() {
    let config: IngestConfig =
        serde_json::from_value(json!({"max_member_bytes": 1024, "include_raw": false})).unwrap();
    assert_eq!(config.max_member_bytes, 1024);
    assert!(!config.include_raw);
    assert_eq!(config.channel_size, 4);
}

proptest! {
    #[test]
    fn normalize_is_idempotent_on_handles(name in "[A-Za-z0-9._-]{1,32}") {
        let once = normalize_username(&name);
        prop_assert_eq!(normalize_username(&once), once.clone());
        prop_assert_eq!(normalize_username(&format!("@{name}")), once.clone());
        prop_assert_eq!(normalize_username(&name.to_uppercase()), once);
    }

    #[test]
    fn valid_usernames_accept_one_at(name in "[A-Za-z0-9._-]{1,32}") {
        prop_assert!(is_valid_handle(&name));
        let with_at = format!("@{name}");
        let with_space = format!("{name} x");
        prop_assert!(is_valid_handle(&with_at));
        prop_assert!(!is_valid_handle(&with_space));
    }

    #[test]
    fn overlong_handles_rejected(name in "[a-z]{65,80}") {
        prop_assert!(!is_valid_handle(&name));
    }
}
