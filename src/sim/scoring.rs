//! Score and perfect-streak rules

use crate::consts::{BASE_POINTS, STREAK_MULTIPLIER};

/// Points for one placement
///
/// `streak_before` counts consecutive perfect hits *before* this one, so the
/// first perfect of a streak is worth `BASE_POINTS`.
pub fn calculate_hit_score(streak_before: u32, is_perfect: bool) -> u64 {
    if !is_perfect {
        return BASE_POINTS;
    }
    BASE_POINTS.saturating_mul(STREAK_MULTIPLIER.saturating_pow(streak_before))
}

/// Streak after a hit: perfects extend it, anything else resets it
#[inline]
pub fn update_perfect_streak(current: u32, is_perfect: bool) -> u32 {
    if is_perfect {
        current.saturating_add(1)
    } else {
        0
    }
}

/// Combo banner text for the HUD, if any
pub fn get_streak_message(streak: u32) -> Option<String> {
    let msg = match streak {
        0 | 1 => return None,
        2 => "DOUBLE!",
        3 => "TRIPLE!",
        4 => "AMAZING!",
        5 => "UNSTOPPABLE!",
        n => return Some(format!("{n}x COMBO")),
    };
    Some(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exponential_perfect_score() {
        let expected = [10, 20, 40, 80, 160];
        for (k, want) in expected.iter().enumerate() {
            assert_eq!(calculate_hit_score(k as u32, true), *want);
        }
    }

    #[test]
    fn test_non_perfect_ignores_streak() {
        assert_eq!(calculate_hit_score(0, false), BASE_POINTS);
        assert_eq!(calculate_hit_score(7, false), BASE_POINTS);
    }

    #[test]
    fn test_huge_streak_saturates() {
        assert_eq!(calculate_hit_score(200, true), u64::MAX);
    }

    #[test]
    fn test_streak_messages() {
        assert_eq!(get_streak_message(0), None);
        assert_eq!(get_streak_message(1), None);
        assert_eq!(get_streak_message(2).as_deref(), Some("DOUBLE!"));
        assert_eq!(get_streak_message(5).as_deref(), Some("UNSTOPPABLE!"));
        assert_eq!(get_streak_message(6).as_deref(), Some("6x COMBO"));
        assert_eq!(get_streak_message(12).as_deref(), Some("12x COMBO"));
    }

    proptest! {
        #[test]
        fn prop_streak_transitions(n in 0u32..10_000) {
            prop_assert_eq!(update_perfect_streak(n, true), n + 1);
            prop_assert_eq!(update_perfect_streak(n, false), 0);
        }
    }
}
