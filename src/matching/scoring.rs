//! Score aggregation: secondary compatibility signals and the weighted
//! combination into one bounded match score
//!
//! All weights are fixed calibration constants. The two profiles are
//! direction-specific: a freelancer scored against a job leans on
//! experience and rating bonuses, a job scored against a freelancer
//! does not.

/// Weights for one match direction. The three weighted components are
/// skill overlap, full-text semantic similarity, and the secondary
/// rate/budget signal.
#[derive(Debug, Clone, Copy)]
pub struct WeightProfile {
    pub skill: f64,
    pub semantic: f64,
    pub secondary: f64,
}

/// Freelancer scored against a job: skill 0.40, semantic 0.30,
/// rate fit 0.15, plus experience and rating bonuses.
pub const CANDIDATE_TO_TARGET: WeightProfile = WeightProfile {
    skill: 0.40,
    semantic: 0.30,
    secondary: 0.15,
};

/// Job scored against a freelancer: skill 0.50, semantic 0.35,
/// budget fit 0.15, no bonuses.
pub const TARGET_TO_CANDIDATE: WeightProfile = WeightProfile {
    skill: 0.50,
    semantic: 0.35,
    secondary: 0.15,
};

/// A bound must be a positive finite number to act as a bound at all;
/// zero or negative budgets would make the decay formulas divide by
/// zero, so they are treated as unset.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Compatibility of an hourly rate with optional budget bounds, in
/// [0, 1].
///
/// - absent rate → 0.5 (neutral, not a penalty)
/// - no bounds → 1.0
/// - inside `[min, max]` inclusive → 1.0
/// - below min → `1 − (min − rate)/min`, floored at 0
/// - above max → `1 − (rate − max)/max`, floored at 0
/// - only min set, rate short of it → `rate/min`
pub fn rate_match(rate: Option<f64>, budget_min: Option<f64>, budget_max: Option<f64>) -> f64 {
    let rate = match positive(rate) {
        Some(rate) => rate,
        None => return 0.5,
    };

    let budget_min = positive(budget_min);
    let budget_max = positive(budget_max);

    match (budget_min, budget_max) {
        (None, None) => 1.0,
        (Some(min), Some(max)) => {
            if rate >= min && rate <= max {
                1.0
            } else if rate < min {
                (1.0 - (min - rate) / min).max(0.0)
            } else {
                (1.0 - (rate - max) / max).max(0.0)
            }
        }
        (None, Some(max)) => {
            if rate <= max {
                1.0
            } else {
                (1.0 - (rate - max) / max).max(0.0)
            }
        }
        (Some(min), None) => {
            if rate >= min {
                1.0
            } else {
                rate / min
            }
        }
    }
}

/// Compatibility of a freelancer's preferred rate with a job's budget
/// ceiling, in [0, 1]. Either side absent means no constraint (1.0);
/// a preferred rate above the ceiling decays linearly in proportion to
/// the overshoot.
pub fn budget_match(preferred_rate: Option<f64>, budget_max: Option<f64>) -> f64 {
    let (preferred, max) = match (positive(preferred_rate), positive(budget_max)) {
        (Some(p), Some(m)) => (p, m),
        _ => return 1.0,
    };

    if preferred <= max {
        1.0
    } else {
        (1.0 - (preferred - max) / preferred).max(0.0)
    }
}

/// Experience bonus: min(years, 10)/10 × 0.1. Caps at 0.1 for ten or
/// more years; absent experience contributes nothing.
pub fn experience_bonus(years: Option<u32>) -> f64 {
    let years = f64::from(years.unwrap_or(0).min(10));
    years / 10.0 * 0.1
}

/// Rating bonus: (rating / 5) × 0.1, with the rating clamped into its
/// documented [0, 5] range first.
pub fn rating_bonus(rating: f64) -> f64 {
    rating.clamp(0.0, 5.0) / 5.0 * 0.1
}

/// Weighted aggregate of the three components plus any bonuses,
/// clamped to [0, 1].
pub fn aggregate(
    profile: &WeightProfile,
    skill: f64,
    semantic: f64,
    secondary: f64,
    bonuses: f64,
) -> f64 {
    let score = skill * profile.skill
        + semantic * profile.semantic
        + secondary * profile.secondary
        + bonuses;
    score.clamp(0.0, 1.0)
}

/// Scale a fractional score to a percentage in [0, 100], rounded to
/// 2 decimal places — the external numeric contract for every score
/// field.
pub fn to_percent(fraction: f64) -> f64 {
    (fraction.clamp(0.0, 1.0) * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_match_absent_rate_is_neutral() {
        assert_eq!(rate_match(None, Some(20.0), Some(40.0)), 0.5);
        assert_eq!(rate_match(None, None, Some(40.0)), 0.5);
        assert_eq!(rate_match(None, None, None), 0.5);
    }

    #[test]
    fn test_rate_match_no_bounds_is_full() {
        assert_eq!(rate_match(Some(85.0), None, None), 1.0);
    }

    #[test]
    fn test_rate_match_inside_range_inclusive() {
        assert_eq!(rate_match(Some(20.0), Some(20.0), Some(40.0)), 1.0);
        assert_eq!(rate_match(Some(30.0), Some(20.0), Some(40.0)), 1.0);
        assert_eq!(rate_match(Some(40.0), Some(20.0), Some(40.0)), 1.0);
    }

    #[test]
    fn test_rate_match_above_max_decays_linearly() {
        // 1 − (50 − 40)/40 = 0.75
        let score = rate_match(Some(50.0), Some(20.0), Some(40.0));
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_rate_match_below_min_decays_linearly() {
        // 1 − (20 − 15)/20 = 0.75
        let score = rate_match(Some(15.0), Some(20.0), Some(40.0));
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_rate_match_decay_floors_at_zero() {
        assert_eq!(rate_match(Some(100.0), Some(5.0), Some(10.0)), 0.0);
    }

    #[test]
    fn test_rate_match_only_max_bound() {
        assert_eq!(rate_match(Some(30.0), None, Some(40.0)), 1.0);
        let score = rate_match(Some(50.0), None, Some(40.0));
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_rate_match_only_min_bound() {
        assert_eq!(rate_match(Some(30.0), Some(20.0), None), 1.0);
        let score = rate_match(Some(10.0), Some(20.0), None);
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rate_match_zero_bounds_treated_as_unset() {
        assert_eq!(rate_match(Some(30.0), Some(0.0), Some(0.0)), 1.0);
        assert_eq!(rate_match(Some(30.0), Some(-5.0), None), 1.0);
    }

    #[test]
    fn test_budget_match_absent_sides() {
        assert_eq!(budget_match(None, Some(40.0)), 1.0);
        assert_eq!(budget_match(Some(30.0), None), 1.0);
        assert_eq!(budget_match(None, None), 1.0);
    }

    #[test]
    fn test_budget_match_within_ceiling() {
        assert_eq!(budget_match(Some(40.0), Some(40.0)), 1.0);
        assert_eq!(budget_match(Some(25.0), Some(40.0)), 1.0);
    }

    #[test]
    fn test_budget_match_overshoot_decays() {
        // 1 − (50 − 40)/50 = 0.8
        let score = budget_match(Some(50.0), Some(40.0));
        assert!((score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_budget_match_zero_preferred_rate_is_unconstrained() {
        assert_eq!(budget_match(Some(0.0), Some(40.0)), 1.0);
    }

    #[test]
    fn test_experience_bonus_caps_at_ten_years() {
        assert_eq!(experience_bonus(None), 0.0);
        assert!((experience_bonus(Some(5)) - 0.05).abs() < 1e-12);
        assert!((experience_bonus(Some(10)) - 0.1).abs() < 1e-12);
        assert!((experience_bonus(Some(25)) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rating_bonus_clamps_rating() {
        assert_eq!(rating_bonus(0.0), 0.0);
        assert!((rating_bonus(5.0) - 0.1).abs() < 1e-12);
        assert!((rating_bonus(2.5) - 0.05).abs() < 1e-12);
        assert!((rating_bonus(7.0) - 0.1).abs() < 1e-12);
        assert_eq!(rating_bonus(-1.0), 0.0);
    }

    #[test]
    fn test_aggregate_clamps_to_unit_interval() {
        let high = aggregate(&CANDIDATE_TO_TARGET, 1.0, 1.0, 1.0, 0.2);
        assert_eq!(high, 1.0);

        // Negative semantic similarity can pull the sum below zero.
        let low = aggregate(&TARGET_TO_CANDIDATE, 0.0, -1.0, 0.0, 0.0);
        assert_eq!(low, 0.0);
    }

    #[test]
    fn test_to_percent_rounds_to_two_decimals() {
        assert_eq!(to_percent(0.123456), 12.35);
        assert_eq!(to_percent(1.0), 100.0);
        assert_eq!(to_percent(0.0), 0.0);
        // Out-of-range fractions clamp before scaling.
        assert_eq!(to_percent(1.7), 100.0);
        assert_eq!(to_percent(-0.3), 0.0);
    }
}
