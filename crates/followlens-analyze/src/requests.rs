//! Follow-request helpers.

use chrono::{DateTime, Duration, Utc};

use followlens_core::RelationshipEntry;

/// Keep entries whose timestamp is older than `age_days` before `now`.
///
/// Entries without a timestamp are kept, since their age is unknown.
/// A non-positive `age_days` returns the input unchanged.
pub fn filter_older_than(
    entries: &[RelationshipEntry],
    age_days: i64,
    now: DateTime<Utc>,
) -> Vec<RelationshipEntry> {
    if age_days <= 0 {
        return entries.to_vec();
    }

    let cutoff = (now - Duration::days(age_days)).timestamp();
    entries
        .iter()
        .filter(|entry| entry.timestamp.is_none_or(|ts| ts < cutoff))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filter_older_than() {
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        let old = (now - Duration::days(30)).timestamp();
        let fresh = (now - Duration::days(2)).timestamp();

        let entries = vec![
            RelationshipEntry::new("old").with_timestamp(Some(old)),
            RelationshipEntry::new("fresh").with_timestamp(Some(fresh)),
            RelationshipEntry::new("undated"),
        ];

        let kept = filter_older_than(&entries, 7, now);
        let names: Vec<_> = kept.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["old", "undated"]);
    }

    #[test]
    fn test_filter_non_positive_age_keeps_all() {
        let entries = vec![RelationshipEntry::new("a").with_timestamp(Some(0))];
        assert_eq!(filter_older_than(&entries, 0, Utc::now()), entries);
        assert_eq!(filter_older_than(&entries, -3, Utc::now()), entries);
    }
}
