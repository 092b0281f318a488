// src/rules.rs

//! Plan Sprint ordering rules.
//!
//! Each rule scores a committed task ordering with a conformance fraction in
//! [0.0, 1.0]. Rules are plain data (a tagged kind plus display metadata)
//! with a pure evaluation function per kind, so the active rule set stays
//! serializable and testable.

use crate::models::{EnergyLevel, PlanSprintTask, TaskDuration};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    QuickWinsFirst,
    FollowPrerequisites,
    EnergyCurve,
    GroupSimilar,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [
        RuleKind::QuickWinsFirst,
        RuleKind::FollowPrerequisites,
        RuleKind::EnergyCurve,
        RuleKind::GroupSimilar,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            RuleKind::QuickWinsFirst => "quick_first",
            RuleKind::FollowPrerequisites => "prerequisites",
            RuleKind::EnergyCurve => "energy_curve",
            RuleKind::GroupSimilar => "group_similar",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RuleKind::QuickWinsFirst => "Quick Wins First",
            RuleKind::FollowPrerequisites => "Follow Prerequisites",
            RuleKind::EnergyCurve => "Energy Management",
            RuleKind::GroupSimilar => "Group Similar",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RuleKind::QuickWinsFirst => "Start with quick tasks to build momentum",
            RuleKind::FollowPrerequisites => "Complete required tasks before dependent ones",
            RuleKind::EnergyCurve => "High energy tasks in the middle, low at ends",
            RuleKind::GroupSimilar => "Keep same-category tasks together",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RuleKind::QuickWinsFirst => "bolt.fill",
            RuleKind::FollowPrerequisites => "arrow.right.circle.fill",
            RuleKind::EnergyCurve => "waveform.path.ecg",
            RuleKind::GroupSimilar => "square.stack.3d.up.fill",
        }
    }

    /// Session level at which the rule joins the active set.
    pub fn unlock_level(&self) -> u32 {
        match self {
            RuleKind::QuickWinsFirst => 1,
            RuleKind::FollowPrerequisites => 3,
            RuleKind::EnergyCurve => 5,
            RuleKind::GroupSimilar => 7,
        }
    }

    /// Scores `ordering` against this rule. Always in [0.0, 1.0].
    pub fn evaluate(&self, ordering: &[PlanSprintTask]) -> f64 {
        match self {
            RuleKind::QuickWinsFirst => quick_wins_first(ordering),
            RuleKind::FollowPrerequisites => follow_prerequisites(ordering),
            RuleKind::EnergyCurve => energy_curve(ordering),
            RuleKind::GroupSimilar => group_similar(ordering),
        }
    }
}

/// Rules active at `level`, in display order (unlock order).
pub fn rules_for_level(level: u32) -> Vec<RuleKind> {
    RuleKind::ALL
        .iter()
        .copied()
        .filter(|rule| level >= rule.unlock_level())
        .collect()
}

/// Mean conformance over the given per-rule scores; 1.0 when no rules ran.
pub fn average_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 1.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

fn quick_wins_first(ordering: &[PlanSprintTask]) -> f64 {
    let n = ordering.len();
    if n < 2 {
        return 1.0;
    }
    let first_third = &ordering[..n / 3 + 1];
    let quick = first_third
        .iter()
        .filter(|t| t.duration == TaskDuration::Quick)
        .count();
    quick as f64 / first_third.len() as f64
}

fn follow_prerequisites(ordering: &[PlanSprintTask]) -> f64 {
    let total_refs: usize = ordering.iter().map(|t| t.prerequisites.len()).sum();
    if total_refs == 0 {
        return 1.0;
    }

    let mut completed: HashSet<&str> = HashSet::new();
    let mut violations = 0usize;
    for task in ordering {
        for prereq in &task.prerequisites {
            if !completed.contains(prereq.as_str()) {
                violations += 1;
            }
        }
        completed.insert(task.id.as_str());
    }

    1.0 - violations as f64 / total_refs as f64
}

fn energy_curve(ordering: &[PlanSprintTask]) -> f64 {
    let n = ordering.len();
    if n < 4 {
        return 1.0;
    }

    let total_high = ordering
        .iter()
        .filter(|t| t.energy_level == EnergyLevel::High)
        .count();
    if total_high == 0 {
        return 1.0;
    }

    let middle = &ordering[n / 3..n * 2 / 3];
    let high_in_middle = middle
        .iter()
        .filter(|t| t.energy_level == EnergyLevel::High)
        .count();

    high_in_middle as f64 / total_high as f64
}

fn group_similar(ordering: &[PlanSprintTask]) -> f64 {
    let n = ordering.len();
    if n < 3 {
        return 1.0;
    }

    let switches = ordering
        .windows(2)
        .filter(|pair| pair[0].category != pair[1].category)
        .count();

    let categories: HashSet<_> = ordering.iter().map(|t| t.category).collect();
    let min_switches = categories.len() - 1;
    let max_switches = n - 1;
    if max_switches == min_switches {
        return 1.0;
    }

    let score =
        1.0 - (switches as f64 - min_switches as f64) / (max_switches - min_switches) as f64;
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskCategory;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn task(
        id: &str,
        category: TaskCategory,
        energy: EnergyLevel,
        duration: TaskDuration,
        prereqs: &[&str],
    ) -> PlanSprintTask {
        PlanSprintTask {
            id: id.to_string(),
            title: id.to_string(),
            category,
            energy_level: energy,
            duration,
            prerequisites: prereqs.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn quick(id: &str) -> PlanSprintTask {
        task(
            id,
            TaskCategory::Mental,
            EnergyLevel::Low,
            TaskDuration::Quick,
            &[],
        )
    }

    fn long(id: &str) -> PlanSprintTask {
        task(
            id,
            TaskCategory::Mental,
            EnergyLevel::Low,
            TaskDuration::Long,
            &[],
        )
    }

    #[test]
    fn rule_set_grows_at_unlock_levels() {
        assert_eq!(rules_for_level(1), vec![RuleKind::QuickWinsFirst]);
        assert_eq!(rules_for_level(2).len(), 1);
        assert_eq!(rules_for_level(3).len(), 2);
        assert_eq!(rules_for_level(5).len(), 3);
        assert_eq!(rules_for_level(7).len(), 4);
        assert_eq!(rules_for_level(10).len(), 4);
    }

    #[test]
    fn quick_wins_scores_the_leading_third() {
        // Four tasks: first third is floor(4/3)+1 = 2 entries.
        let ordering = vec![quick("a"), quick("b"), long("c"), long("d")];
        assert_eq!(RuleKind::QuickWinsFirst.evaluate(&ordering), 1.0);

        let ordering = vec![long("c"), quick("a"), quick("b"), long("d")];
        assert_eq!(RuleKind::QuickWinsFirst.evaluate(&ordering), 0.5);
    }

    #[test]
    fn quick_wins_trivial_below_two_tasks() {
        assert_eq!(RuleKind::QuickWinsFirst.evaluate(&[long("only")]), 1.0);
    }

    #[test]
    fn prerequisites_count_violations_against_total_references() {
        let warmup = quick("warmup");
        let cardio = task(
            "cardio",
            TaskCategory::Physical,
            EnergyLevel::High,
            TaskDuration::Medium,
            &["warmup"],
        );
        let cooldown = task(
            "cooldown",
            TaskCategory::Physical,
            EnergyLevel::Low,
            TaskDuration::Quick,
            &["cardio", "warmup"],
        );

        let good = vec![warmup.clone(), cardio.clone(), cooldown.clone()];
        assert_eq!(RuleKind::FollowPrerequisites.evaluate(&good), 1.0);

        // cooldown first violates both its references.
        let bad = vec![cooldown, warmup, cardio];
        let expected = 1.0 - 2.0 / 3.0;
        assert!((RuleKind::FollowPrerequisites.evaluate(&bad) - expected).abs() < 1e-9);
    }

    #[test]
    fn prerequisites_trivial_without_references() {
        let ordering = vec![quick("a"), quick("b")];
        assert_eq!(RuleKind::FollowPrerequisites.evaluate(&ordering), 1.0);
    }

    #[test]
    fn energy_curve_rewards_high_energy_in_the_middle() {
        let high = |id: &str| {
            task(
                id,
                TaskCategory::Mental,
                EnergyLevel::High,
                TaskDuration::Medium,
                &[],
            )
        };
        // n = 6, middle slice is indices [2, 4).
        let ordering = vec![
            quick("a"),
            quick("b"),
            high("c"),
            high("d"),
            quick("e"),
            quick("f"),
        ];
        assert_eq!(RuleKind::EnergyCurve.evaluate(&ordering), 1.0);

        let ordering = vec![
            high("c"),
            quick("a"),
            quick("b"),
            quick("e"),
            quick("f"),
            high("d"),
        ];
        assert_eq!(RuleKind::EnergyCurve.evaluate(&ordering), 0.0);
    }

    #[test]
    fn energy_curve_trivial_cases() {
        assert_eq!(
            RuleKind::EnergyCurve.evaluate(&[quick("a"), quick("b"), quick("c")]),
            1.0
        );
        // No high-energy tasks at all.
        let ordering = vec![quick("a"), quick("b"), quick("c"), quick("d")];
        assert_eq!(RuleKind::EnergyCurve.evaluate(&ordering), 1.0);
    }

    #[test]
    fn group_similar_prefers_contiguous_categories() {
        let mental = |id: &str| quick(id);
        let physical = |id: &str| {
            task(
                id,
                TaskCategory::Physical,
                EnergyLevel::Low,
                TaskDuration::Quick,
                &[],
            )
        };

        let grouped = vec![mental("a"), mental("b"), physical("c"), physical("d")];
        assert_eq!(RuleKind::GroupSimilar.evaluate(&grouped), 1.0);

        let alternating = vec![mental("a"), physical("c"), mental("b"), physical("d")];
        assert_eq!(RuleKind::GroupSimilar.evaluate(&alternating), 0.0);
    }

    #[test]
    fn group_similar_single_category_is_perfect() {
        let ordering = vec![quick("a"), quick("b"), quick("c")];
        assert_eq!(RuleKind::GroupSimilar.evaluate(&ordering), 1.0);
    }

    #[test]
    fn all_rules_stay_in_range_over_random_permutations() {
        let mut pool = vec![
            task(
                "warmup",
                TaskCategory::Physical,
                EnergyLevel::Low,
                TaskDuration::Quick,
                &[],
            ),
            task(
                "cardio",
                TaskCategory::Physical,
                EnergyLevel::High,
                TaskDuration::Medium,
                &["warmup"],
            ),
            task(
                "notes",
                TaskCategory::Mental,
                EnergyLevel::Medium,
                TaskDuration::Quick,
                &[],
            ),
            task(
                "brainstorm",
                TaskCategory::Creative,
                EnergyLevel::High,
                TaskDuration::Medium,
                &["notes"],
            ),
            task(
                "filing",
                TaskCategory::Organizational,
                EnergyLevel::Low,
                TaskDuration::Quick,
                &[],
            ),
            task(
                "cooldown",
                TaskCategory::Physical,
                EnergyLevel::Low,
                TaskDuration::Quick,
                &["cardio"],
            ),
        ];

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            pool.shuffle(&mut rng);
            for len in 1..=pool.len() {
                let ordering = &pool[..len];
                for rule in RuleKind::ALL {
                    let score = rule.evaluate(ordering);
                    assert!(
                        (0.0..=1.0).contains(&score),
                        "{:?} scored {} out of range",
                        rule,
                        score
                    );
                }
            }
        }
    }

    #[test]
    fn average_of_no_rules_is_perfect() {
        assert_eq!(average_score(&[]), 1.0);
        assert_eq!(average_score(&[0.5, 1.0]), 0.75);
    }
}
