//! Dataset kinds and the classification tables that recognize them.
//!
//! Classification is best-effort: export schemas drift between revisions, so
//! the tables below are data, not logic. Filename hints are tried first, then
//! top-level JSON keys.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, IntoEnumIterator};

/// The closed set of dataset kinds an export document can be classified as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    Followers,
    Following,
    PendingSentRequests,
    PendingReceivedRequests,
    RecentRequests,
    Restricted,
    #[serde(rename = "hide_story")]
    #[strum(serialize = "hide_story")]
    HideStoryFrom,
    Hashtags,
    Blocked,
    RecentlyUnfollowed,
    DismissedSuggestions,
    ProfileInformation,
    Unknown,
}

impl DatasetKind {
    /// Kinds whose documents are lists of `string_list_data` relationship records.
    pub fn is_relationship(self) -> bool {
        !matches!(
            self,
            Self::Hashtags | Self::ProfileInformation | Self::Unknown
        )
    }

    /// Whether a document of this kind is expected to contain at least one entry.
    pub fn expects_entries(self) -> bool {
        self != Self::ProfileInformation
    }

    /// The classification rule for this kind, if it has one.
    pub fn rule(self) -> Option<&'static KindRule> {
        KIND_RULES.iter().find(|rule| rule.kind == self)
    }

    /// Top-level JSON keys that identify (and hold the records of) this kind.
    pub fn json_keys(self) -> &'static [&'static str] {
        self.rule().map(|rule| rule.json_keys).unwrap_or(&[])
    }

    /// All kinds except [`DatasetKind::Unknown`].
    pub fn known() -> impl Iterator<Item = DatasetKind> {
        Self::iter().filter(|kind| *kind != Self::Unknown)
    }
}

/// One row of the classification table.
#[derive(Debug)]
pub struct KindRule {
    /// Kind this rule recognizes.
    pub kind: DatasetKind,
    /// Case-insensitive regex patterns matched against the file's base name.
    pub file_hints: &'static [&'static str],
    /// Top-level object keys that identify the kind.
    pub json_keys: &'static [&'static str],
}

/// Classification table, in priority order.
///
/// Hashtags come first: their export file is named `following_hashtags.json`.
pub const KIND_RULES: &[KindRule] = &[
    KindRule {
        kind: DatasetKind::Hashtags,
        file_hints: &["hashtag"],
        json_keys: &[
            "hashtags_following",
            "hashtags",
            "relationships_following_hashtags",
        ],
    },
    KindRule {
        kind: DatasetKind::Followers,
        file_hints: &["follower"],
        json_keys: &["relationships_followers", "followers", "followers_list"],
    },
    KindRule {
        kind: DatasetKind::Following,
        file_hints: &["following"],
        json_keys: &["relationships_following", "following", "following_list"],
    },
    KindRule {
        kind: DatasetKind::PendingSentRequests,
        file_hints: &["pending.*(sent|outgoing)"],
        json_keys: &[
            "pending_follow_requests_sent",
            "follow_requests_sent",
            "relationships_follow_requests_sent",
        ],
    },
    KindRule {
        kind: DatasetKind::PendingReceivedRequests,
        file_hints: &["pending.*(received|incoming)"],
        json_keys: &[
            "pending_follow_requests",
            "follow_requests_received",
            "relationships_follow_requests_received",
        ],
    },
    KindRule {
        kind: DatasetKind::RecentRequests,
        file_hints: &["recent.*requests"],
        json_keys: &[
            "recent_follow_requests",
            "relationships_permanent_follow_requests",
        ],
    },
    KindRule {
        kind: DatasetKind::Restricted,
        file_hints: &["restricted"],
        json_keys: &[
            "restricted_profiles",
            "restricted_list",
            "relationships_restricted_users",
        ],
    },
    KindRule {
        kind: DatasetKind::HideStoryFrom,
        file_hints: &["hide.*story", "story.*hide"],
        json_keys: &[
            "hide_story_from",
            "hidden_story_replies",
            "relationships_hide_stories_from",
        ],
    },
    KindRule {
        kind: DatasetKind::Blocked,
        file_hints: &["blocked"],
        json_keys: &[
            "blocked_profiles",
            "blocked_list",
            "relationships_blocked_users",
        ],
    },
    KindRule {
        kind: DatasetKind::RecentlyUnfollowed,
        file_hints: &["unfollow"],
        json_keys: &[
            "recently_unfollowed_profiles",
            "recently_unfollowed",
            "relationships_unfollowed_users",
        ],
    },
    KindRule {
        kind: DatasetKind::DismissedSuggestions,
        file_hints: &["removed_suggestions", "dismissed"],
        json_keys: &[
            "removed_suggestions",
            "dismissed_suggestions",
            "relationships_dismissed_suggested_users",
        ],
    },
    KindRule {
        kind: DatasetKind::ProfileInformation,
        file_hints: &["profile"],
        json_keys: &["profile", "account_information"],
    },
];

static FILE_HINTS: LazyLock<Vec<(DatasetKind, Vec<Regex>)>> = LazyLock::new(|| {
    KIND_RULES
        .iter()
        .map(|rule| {
            let patterns = rule
                .file_hints
                .iter()
                .filter_map(|hint| Regex::new(&format!("(?i){hint}")).ok())
                .collect();
            (rule.kind, patterns)
        })
        .collect()
});

/// Classify by the base name of `file_name` (path separators `/` and `\` are honored).
pub fn kind_from_file_name(file_name: &str) -> Option<DatasetKind> {
    let base_name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    FILE_HINTS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(base_name)))
        .map(|(kind, _)| *kind)
}

/// Classify by the top-level keys of a JSON object.
pub fn kind_from_json_object(object: &Map<String, Value>) -> Option<DatasetKind> {
    KIND_RULES
        .iter()
        .find(|rule| rule.json_keys.iter().any(|key| object.contains_key(*key)))
        .map(|rule| rule.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_hint_compiles() {
        for (kind, patterns) in FILE_HINTS.iter() {
            let rule = kind.rule().unwrap();
            assert_eq!(patterns.len(), rule.file_hints.len(), "{kind}");
        }
    }

    #[test]
    fn test_every_known_kind_has_a_rule() {
        for kind in DatasetKind::known() {
            assert!(kind.rule().is_some(), "{kind} has no rule");
        }
        assert!(DatasetKind::Unknown.rule().is_none());
    }

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(kind_from_file_name("followers_1.json"), Some(DatasetKind::Followers));
        assert_eq!(
            kind_from_file_name("connections/followers_and_following/following.json"),
            Some(DatasetKind::Following)
        );
        assert_eq!(
            kind_from_file_name("C:\\export\\recently_unfollowed_profiles.json"),
            Some(DatasetKind::RecentlyUnfollowed)
        );
        assert_eq!(
            kind_from_file_name("pending_follow_requests_SENT.json"),
            Some(DatasetKind::PendingSentRequests)
        );
        assert_eq!(kind_from_file_name("messages.json"), None);
    }

    #[test]
    fn test_kind_from_json_object() {
        let object = serde_json::json!({ "relationships_following": [], "other": 1 });
        assert_eq!(
            kind_from_json_object(object.as_object().unwrap()),
            Some(DatasetKind::Following)
        );
        let none = serde_json::json!({ "nothing": [], "here": {} });
        assert_eq!(kind_from_json_object(none.as_object().unwrap()), None);
    }

    #[test]
    fn test_hashtag_files_are_not_mistaken_for_following() {
        assert_eq!(
            kind_from_file_name("following_hashtags.json"),
            Some(DatasetKind::Hashtags)
        );
    }

    #[test]
    fn test_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&DatasetKind::HideStoryFrom).unwrap(),
            "\"hide_story\""
        );
        assert_eq!(DatasetKind::PendingSentRequests.to_string(), "pending_sent_requests");
        let parsed: DatasetKind = serde_json::from_str("\"recently_unfollowed\"").unwrap();
        assert_eq!(parsed, DatasetKind::RecentlyUnfollowed);
    }

    #[test]
    fn test_relationship_kinds() {
        assert!(DatasetKind::Followers.is_relationship());
        assert!(DatasetKind::DismissedSuggestions.is_relationship());
        assert!(!DatasetKind::Hashtags.is_relationship());
        assert!(!DatasetKind::Unknown.is_relationship());
        assert!(!DatasetKind::ProfileInformation.expects_entries());
    }
}
