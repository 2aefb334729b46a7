//! Points-and-level progression: how a finished walk turns into points, and
//! how points carry into levels.

/// Points awarded per 100 accumulated before a level-up.
pub const POINTS_PER_LEVEL: i32 = 100;

/// Reward table for a completed walk. Tiers are checked high-to-low and at
/// most one tier per list applies; the two bonus lists and the base are
/// additive.
#[derive(Debug, Clone)]
pub struct RewardRules {
    pub base_points: i32,
    /// (minimum stability score, bonus points)
    pub stability_tiers: Vec<(f64, i32)>,
    /// (minimum distance in meters, bonus points)
    pub distance_tiers: Vec<(i32, i32)>,
}

impl RewardRules {
    pub fn with_base(base_points: i32) -> Self {
        Self {
            base_points,
            ..Self::default()
        }
    }

    /// Total reward for one finished walk. A walk that ended without a
    /// stability score or distance simply earns no bonus from that metric.
    pub fn walk_reward(&self, stable_score: Option<f64>, distance: Option<i32>) -> i32 {
        let stability_bonus = stable_score
            .and_then(|score| {
                self.stability_tiers
                    .iter()
                    .find(|(min, _)| score >= *min)
                    .map(|(_, bonus)| *bonus)
            })
            .unwrap_or(0);

        let distance_bonus = distance
            .and_then(|meters| {
                self.distance_tiers
                    .iter()
                    .find(|(min, _)| meters >= *min)
                    .map(|(_, bonus)| *bonus)
            })
            .unwrap_or(0);

        self.base_points + stability_bonus + distance_bonus
    }
}

impl Default for RewardRules {
    fn default() -> Self {
        Self {
            base_points: 7,
            stability_tiers: vec![(90.0, 5), (80.0, 3)],
            distance_tiers: vec![(1500, 13), (1000, 8), (500, 3)],
        }
    }
}

/// Add `delta` points to an account's (level, points) pair, carrying each
/// full 100 points into a level. Handles arbitrarily large deltas, so a
/// single walk can jump several levels.
pub fn apply_points(level: i32, points: i32, delta: i32) -> (i32, i32) {
    debug_assert!(delta >= 0);
    let mut level = level;
    let mut points = points + delta;
    while points >= POINTS_PER_LEVEL {
        level += 1;
        points -= POINTS_PER_LEVEL;
    }
    (level, points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carry_single_level() {
        assert_eq!(apply_points(1, 95, 10), (2, 5));
    }

    #[test]
    fn carry_multiple_levels() {
        assert_eq!(apply_points(1, 0, 250), (3, 50));
    }

    #[test]
    fn no_carry_below_threshold() {
        assert_eq!(apply_points(4, 40, 59), (4, 99));
    }

    #[test]
    fn reward_is_conserved_across_the_carry() {
        for (level, points, delta) in [(1, 0, 0), (1, 99, 1), (2, 37, 412), (9, 95, 95)] {
            let (new_level, new_points) = apply_points(level, points, delta);
            assert!(new_points < POINTS_PER_LEVEL);
            assert!(new_level >= level);
            assert_eq!(
                POINTS_PER_LEVEL * (new_level - level) + new_points - points,
                delta
            );
        }
    }

    #[test]
    fn reward_composes_base_and_both_bonuses() {
        let rules = RewardRules::default();
        // 7 base + 5 stability + 13 distance
        assert_eq!(rules.walk_reward(Some(92.0), Some(2000)), 25);
        // 7 base + 3 stability + 8 distance
        assert_eq!(rules.walk_reward(Some(85.0), Some(1200)), 18);
        // 7 base + 0 + 3 distance
        assert_eq!(rules.walk_reward(Some(50.0), Some(600)), 10);
    }

    #[test]
    fn reward_tier_boundaries_are_inclusive() {
        let rules = RewardRules::default();
        assert_eq!(rules.walk_reward(Some(90.0), None), 12);
        assert_eq!(rules.walk_reward(Some(89.9), None), 10);
        assert_eq!(rules.walk_reward(None, Some(500)), 10);
        assert_eq!(rules.walk_reward(None, Some(499)), 7);
    }

    #[test]
    fn missing_metrics_earn_no_bonus() {
        let rules = RewardRules::default();
        assert_eq!(rules.walk_reward(None, None), rules.base_points);
    }

    #[test]
    fn base_is_configurable() {
        let rules = RewardRules::with_base(2);
        assert_eq!(rules.walk_reward(None, None), 2);
        assert_eq!(rules.walk_reward(Some(95.0), Some(1600)), 20);
    }
}
