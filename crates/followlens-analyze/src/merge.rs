//! Merging datasets of the same kind.
//!
//! Exports split large relationship lists across several files
//! (`followers_1.json`, `followers_2.json`, ...). Merging groups datasets by
//! kind, concatenates their entries in input order and keeps the first entry
//! seen for each normalized username.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use followlens_core::{DatasetKind, ExtractedDataset, RelationshipEntry};

/// Merged entries per dataset kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedDatasets {
    by_kind: BTreeMap<DatasetKind, Vec<RelationshipEntry>>,
}

impl MergedDatasets {
    /// Entries of a kind; empty when no dataset of that kind was merged.
    pub fn get(&self, kind: DatasetKind) -> &[RelationshipEntry] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Take the entries of a kind, leaving an empty bucket behind.
    pub fn take(&mut self, kind: DatasetKind) -> Vec<RelationshipEntry> {
        self.by_kind.remove(&kind).unwrap_or_default()
    }

    /// Kinds present in the merge.
    pub fn kinds(&self) -> impl Iterator<Item = DatasetKind> + '_ {
        self.by_kind.keys().copied()
    }

    /// Consume into the underlying map.
    pub fn into_map(self) -> BTreeMap<DatasetKind, Vec<RelationshipEntry>> {
        self.by_kind
    }
}

/// Index entries by normalized username, keeping the first occurrence.
pub fn index_entries<'a>(
    entries: impl IntoIterator<Item = &'a RelationshipEntry>,
) -> IndexMap<String, RelationshipEntry> {
    let mut map = IndexMap::new();
    for entry in entries {
        map.entry(entry.key()).or_insert_with(|| entry.clone());
    }
    map
}

/// Merge datasets by kind.
pub fn merge_datasets<'a>(
    datasets: impl IntoIterator<Item = &'a ExtractedDataset>,
) -> MergedDatasets {
    let mut grouped: BTreeMap<DatasetKind, IndexMap<String, RelationshipEntry>> = BTreeMap::new();

    for dataset in datasets {
        let bucket = grouped.entry(dataset.kind()).or_default();
        for entry in dataset.entries() {
            bucket.entry(entry.key()).or_insert_with(|| entry.clone());
        }
    }

    MergedDatasets {
        by_kind: grouped
            .into_iter()
            .map(|(kind, entries)| (kind, entries.into_values().collect()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn dataset(kind: DatasetKind, names: &[&str]) -> ExtractedDataset {
        let entries = names.iter().map(|name| RelationshipEntry::new(*name)).collect();
        ExtractedDataset::new(kind, entries, format!("{kind}.json"), Value::Null)
    }

    #[test]
    fn test_merge_dedups_across_parts() {
        let part1 = dataset(DatasetKind::Followers, &["Alice", "bob"]);
        let part2 = dataset(DatasetKind::Followers, &["@alice", "carol"]);

        let merged = merge_datasets([&part1, &part2]);
        let followers = merged.get(DatasetKind::Followers);

        let names: Vec<_> = followers.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["Alice", "bob", "carol"]);
    }

    #[test]
    fn test_merge_keeps_kinds_apart() {
        let followers = dataset(DatasetKind::Followers, &["alice"]);
        let following = dataset(DatasetKind::Following, &["alice"]);

        let merged = merge_datasets([&followers, &following]);
        assert_eq!(merged.get(DatasetKind::Followers).len(), 1);
        assert_eq!(merged.get(DatasetKind::Following).len(), 1);
        assert!(merged.get(DatasetKind::Blocked).is_empty());
        assert_eq!(merged.kinds().count(), 2);
    }

    #[test]
    fn test_index_entries_first_wins() {
        let entries = [RelationshipEntry::new("Zed"), RelationshipEntry::new("zed")];
        let map = index_entries(&entries);
        assert_eq!(map.len(), 1);
        assert_eq!(map["zed"].username, "Zed");
    }
}
