// src/scoring.rs

//! Scoring engine: pure functions turning round outcomes into point totals.
//!
//! All inputs come from the session layer; nothing here reads state or the
//! clock, which keeps every formula directly testable.

use crate::constants::*;

/// Points for one Focus Grid round.
///
/// `correct_taps` is however far the player got, so a failed round still
/// earns its partial score. The result is clamped at zero before the
/// difficulty multiplier is applied.
pub fn focus_grid_score(
    correct_taps: u32,
    completed: bool,
    seconds_remaining: u32,
    mistakes: u32,
    level: u32,
    multiplier: f64,
) -> u32 {
    let base = i64::from(correct_taps) * POINTS_PER_TAP;
    let completion_bonus = if completed { COMPLETION_BONUS } else { 0 };
    let time_bonus = i64::from(seconds_remaining) * FOCUS_TIME_BONUS_PER_SECOND;
    let mistake_penalty = i64::from(mistakes) * MISTAKE_PENALTY;
    let level_bonus = i64::from(level) * FOCUS_LEVEL_BONUS;

    let raw = (base + completion_bonus + time_bonus - mistake_penalty + level_bonus).max(0);
    (raw as f64 * multiplier).round() as u32
}

/// Points for one Plan Sprint commit, given the mean rule conformance.
pub fn plan_sprint_score(
    average_rule_score: f64,
    seconds_remaining: u32,
    level: u32,
    multiplier: f64,
) -> u32 {
    let accuracy_points = (average_rule_score * ACCURACY_POINTS_SCALE).round() as i64;
    let time_bonus = i64::from(seconds_remaining) * SPRINT_TIME_BONUS_PER_SECOND;
    let level_bonus = i64::from(level) * SPRINT_LEVEL_BONUS;

    ((accuracy_points + time_bonus + level_bonus) as f64 * multiplier).round() as u32
}

/// A Plan Sprint commit passes at half conformance or better.
pub fn sprint_passes(average_rule_score: f64) -> bool {
    average_rule_score >= PASS_THRESHOLD
}

pub fn sprint_is_perfect(average_rule_score: f64) -> bool {
    average_rule_score >= PERFECT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_grid_score_adds_up() {
        // 2 taps (30) + completion (50) + no time left - 1 mistake (10)
        // + level 1 (10) = 80 raw, multiplier 1.0.
        assert_eq!(focus_grid_score(2, true, 0, 1, 1, 1.0), 80);

        // Same round on a 2.0 multiplier doubles.
        assert_eq!(focus_grid_score(2, true, 0, 1, 1, 2.0), 160);
    }

    #[test]
    fn focus_grid_partial_score_on_failure() {
        // 1 tap, not completed, 4s left, 2 mistakes, level 3:
        // 15 + 0 + 12 - 20 + 30 = 37.
        assert_eq!(focus_grid_score(1, false, 4, 2, 3, 1.0), 37);
    }

    #[test]
    fn focus_grid_score_never_goes_negative() {
        assert_eq!(focus_grid_score(0, false, 0, 9, 0, 1.5), 0);
    }

    #[test]
    fn plan_sprint_score_adds_up() {
        // Perfect conformance (100) + 10s (20) + level 1 (15) = 135.
        assert_eq!(plan_sprint_score(1.0, 10, 1, 1.0), 135);
        // Multiplier rounds after summing: 135 * 1.5 = 202.5 -> 203.
        assert_eq!(plan_sprint_score(1.0, 10, 1, 1.5), 203);
    }

    #[test]
    fn sprint_pass_and_perfect_thresholds() {
        assert!(sprint_passes(0.5));
        assert!(!sprint_passes(0.49));
        assert!(sprint_is_perfect(0.95));
        assert!(!sprint_is_perfect(0.94));
    }
}
