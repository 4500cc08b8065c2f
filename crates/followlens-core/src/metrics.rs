//! Follow-graph metrics.

use serde::{Deserialize, Serialize};

/// Numeric KPIs derived from a follower/following pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowMetrics {
    /// Accounts the user follows.
    pub following_count: usize,
    /// Accounts following the user.
    pub followers_count: usize,
    /// Accounts in both sets.
    pub mutual_count: usize,
    /// Followed accounts that do not follow back.
    pub not_following_back_count: usize,
    /// Followers the user does not follow.
    pub fans_you_dont_follow_count: usize,
    /// `mutual_count / following_count`, 1 when nothing is followed.
    pub reciprocity_rate: f64,
    /// `mutual_count / followers_count`, 1 when there are no followers.
    pub follow_back_rate: f64,
}

impl FollowMetrics {
    /// Compute metrics from the five counts.
    pub fn from_counts(
        followers_count: usize,
        following_count: usize,
        mutual_count: usize,
        not_following_back_count: usize,
        fans_you_dont_follow_count: usize,
    ) -> Self {
        Self {
            following_count,
            followers_count,
            mutual_count,
            not_following_back_count,
            fans_you_dont_follow_count,
            reciprocity_rate: rate(mutual_count, following_count),
            follow_back_rate: rate(mutual_count, followers_count),
        }
    }
}

/// Ratio rounded to 4 decimal places; a zero denominator yields 1.
pub fn rate(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 1.0;
    }
    round4(numerator as f64 / denominator as f64)
}

/// Round to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rounds_to_four_places() {
        assert_eq!(rate(2, 3), 0.6667);
        assert_eq!(rate(1, 3), 0.3333);
        assert_eq!(rate(3, 3), 1.0);
    }

    #[test]
    fn test_rate_zero_denominator_is_one() {
        assert_eq!(rate(0, 0), 1.0);
    }

    #[test]
    fn test_metrics_from_counts() {
        let metrics = FollowMetrics::from_counts(3, 3, 2, 1, 1);
        assert_eq!(metrics.reciprocity_rate, 0.6667);
        assert_eq!(metrics.follow_back_rate, 0.6667);

        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["fansYouDontFollowCount"], 1);
        assert_eq!(json["reciprocityRate"], 0.6667);
    }
}
