//! Account metadata extraction.

use chrono::{DateTime, Utc};
use serde_json::Value;

use followlens_core::{AccountInfo, DatasetKind, ExtractedDataset};

/// Timestamps above this are already in milliseconds.
const MILLIS_THRESHOLD: f64 = 10_000_000_000.0;

/// Derive account metadata from the profile-information dataset.
///
/// The snapshot date falls back to `fallback` (usually the newest input
/// modification time), then to `now`.
pub fn extract_account(
    datasets: &[ExtractedDataset],
    fallback: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> AccountInfo {
    let profile = datasets
        .iter()
        .find(|dataset| dataset.kind() == DatasetKind::ProfileInformation)
        .map(ExtractedDataset::raw);

    let username = profile.and_then(find_username);
    let snapshot_date = profile
        .and_then(find_timestamp)
        .or(fallback)
        .unwrap_or(now);

    AccountInfo {
        username,
        snapshot_date: Some(snapshot_date),
    }
}

fn find_username(raw: &Value) -> Option<String> {
    let candidates = [
        raw.get("username"),
        raw.pointer("/profile_user/username"),
        raw.pointer("/profile/username"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

fn find_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    [raw.get("timestamp"), raw.pointer("/profile_user/timestamp")]
        .into_iter()
        .flatten()
        .find_map(Value::as_f64)
        .filter(|ts| ts.is_finite() && *ts > 0.0)
        .and_then(|ts| {
            let millis = if ts > MILLIS_THRESHOLD { ts } else { ts * 1000.0 };
            DateTime::from_timestamp_millis(millis as i64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn profile(raw: Value) -> ExtractedDataset {
        ExtractedDataset::new(DatasetKind::ProfileInformation, Vec::new(), "profile.json", raw)
    }

    #[test]
    fn test_username_lookup_order() {
        let now = Utc::now();
        let direct = profile(json!({"username": " jane ", "profile_user": {"username": "other"}}));
        assert_eq!(extract_account(&[direct], None, now).username.as_deref(), Some("jane"));

        let nested = profile(json!({"profile_user": {"username": "nested"}}));
        assert_eq!(extract_account(&[nested], None, now).username.as_deref(), Some("nested"));

        let blank = profile(json!({"username": "  ", "profile": {"username": "deep"}}));
        assert_eq!(extract_account(&[blank], None, now).username.as_deref(), Some("deep"));
    }

    #[test]
    fn test_timestamp_seconds_and_millis() {
        let now = Utc::now();
        let expected = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let seconds = profile(json!({"timestamp": 1_700_000_000}));
        assert_eq!(extract_account(&[seconds], None, now).snapshot_date, Some(expected));

        let millis = profile(json!({"profile_user": {"timestamp": 1_700_000_000_000u64}}));
        assert_eq!(extract_account(&[millis], None, now).snapshot_date, Some(expected));
    }

    #[test]
    fn test_fallbacks() {
        let now = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
        let modified = Utc.timestamp_opt(1_750_000_000, 0).unwrap();

        let account = extract_account(&[], Some(modified), now);
        assert_eq!(account.username, None);
        assert_eq!(account.snapshot_date, Some(modified));

        let account = extract_account(&[], None, now);
        assert_eq!(account.snapshot_date, Some(now));
    }
}
