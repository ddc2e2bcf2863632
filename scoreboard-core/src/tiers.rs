//! Reward tier resolution

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{Points, RewardTier};

/// Earned and locked tiers for a point total, both ascending by threshold
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TierStatus {
    pub earned: Vec<RewardTier>,
    pub locked: Vec<RewardTier>,
}

impl TierStatus {
    /// The cheapest tier not yet earned.
    pub fn next_locked(&self) -> Option<&RewardTier> {
        self.locked.first()
    }

    /// Points still needed for the next tier.
    pub fn points_to_next(&self, points: Points) -> Option<Points> {
        self.next_locked().map(|tier| tier.threshold - points)
    }
}

/// Partition `tiers` into earned (`threshold <= points`) and locked.
pub fn resolve(points: Points, tiers: &[RewardTier]) -> TierStatus {
    let mut sorted = tiers.to_vec();
    sorted.sort_by(|a, b| {
        a.threshold
            .partial_cmp(&b.threshold)
            .unwrap_or(Ordering::Equal)
    });

    let (earned, locked) = sorted.into_iter().partition(|tier| tier.threshold <= points);
    TierStatus { earned, locked }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(id: &str, threshold: f64) -> RewardTier {
        RewardTier {
            id: id.to_string(),
            name: id.to_uppercase(),
            threshold,
            desc: None,
            icon: None,
        }
    }

    #[test]
    fn threshold_equal_to_total_is_earned() {
        let tiers = vec![tier("fox", 25.0)];

        let at = resolve(25.0, &tiers);
        assert_eq!(at.earned.len(), 1);
        assert!(at.locked.is_empty());

        let below = resolve(24.0, &tiers);
        assert!(below.earned.is_empty());
        assert_eq!(below.locked.len(), 1);
    }

    #[test]
    fn outputs_are_sorted_ascending() {
        let tiers = vec![tier("owl", 100.0), tier("cat", 10.0), tier("fox", 50.0), tier("ant", 0.0)];

        let status = resolve(60.0, &tiers);
        let earned: Vec<_> = status.earned.iter().map(|t| t.id.as_str()).collect();
        let locked: Vec<_> = status.locked.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(earned, vec!["ant", "cat", "fox"]);
        assert_eq!(locked, vec!["owl"]);
    }

    #[test]
    fn empty_tiers_give_empty_status() {
        let status = resolve(999.0, &[]);
        assert_eq!(status, TierStatus::default());
        assert!(status.next_locked().is_none());
    }

    #[test]
    fn points_to_next_uses_cheapest_locked_tier() {
        let tiers = vec![tier("owl", 100.0), tier("fox", 50.0)];
        let status = resolve(42.0, &tiers);
        assert_eq!(status.next_locked().map(|t| t.id.as_str()), Some("fox"));
        assert_eq!(status.points_to_next(42.0), Some(8.0));
    }

    #[test]
    fn negative_total_does_not_earn_zero_threshold_tier() {
        let tiers = vec![tier("egg", 0.0)];
        let status = resolve(-3.0, &tiers);
        assert!(status.earned.is_empty());
    }
}
