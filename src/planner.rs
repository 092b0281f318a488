// src/planner.rs

//! Daily plan builder.
//!
//! Derives up to three recommended drills for the day from the selected
//! track, a randomly chosen other track, and a quick streak-saver option.
//! The plan never repeats a drill id, and each entry knows whether that
//! drill was already completed today.

use crate::catalog::Catalog;
use crate::constants::*;
use crate::models::{DailyPlan, PlanReason, PlannedDrill, UserProgress};
use chrono::NaiveDate;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds today's plan. Deterministic apart from the variety-track pick,
/// which draws from `rng`.
pub fn build_daily_plan(
    catalog: &Catalog,
    progress: &UserProgress,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> DailyPlan {
    let mut entries: Vec<PlannedDrill> = Vec::new();

    // 1. The selected track's first recommended drill.
    if let Some(track) = catalog.track(&progress.selected_track_id) {
        if let Some(drill_id) = track.recommended_drill_ids.first() {
            if catalog.drill(drill_id).is_some() {
                entries.push(plan_entry(drill_id, PlanReason::Recommended, progress, today));
            }
        }
    }

    // 2. A recommended drill from a random other track, unless it repeats.
    let other_tracks: Vec<_> = catalog
        .tracks()
        .iter()
        .filter(|t| t.id != progress.selected_track_id)
        .collect();
    if let Some(variety_track) = other_tracks.choose(rng) {
        if let Some(drill_id) = variety_track.recommended_drill_ids.first() {
            if catalog.drill(drill_id).is_some()
                && !entries.iter().any(|e| &e.drill_id == drill_id)
            {
                entries.push(plan_entry(drill_id, PlanReason::Variety, progress, today));
            }
        }
    }

    // 3. The first short drill not already planned, to protect the streak.
    let streak_saver = catalog
        .drills_with_duration(STREAK_SAVER_MINUTES)
        .into_iter()
        .find(|drill| !entries.iter().any(|e| e.drill_id == drill.id));
    if let Some(drill) = streak_saver {
        entries.push(plan_entry(&drill.id, PlanReason::StreakSaver, progress, today));
    }

    debug!("Daily plan for {}: {} entries", today, entries.len());
    DailyPlan {
        date: today,
        entries,
    }
}

fn plan_entry(
    drill_id: &str,
    reason: PlanReason,
    progress: &UserProgress,
    today: NaiveDate,
) -> PlannedDrill {
    PlannedDrill {
        drill_id: drill_id.to_string(),
        reason,
        completed: completed_today(progress, drill_id, today),
    }
}

/// Whether the history log holds a completion of `drill_id` dated `today`.
pub fn completed_today(progress: &UserProgress, drill_id: &str, today: NaiveDate) -> bool {
    progress
        .drill_history
        .iter()
        .any(|entry| entry.drill_id == drill_id && entry.completed_at.date_naive() == today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, DrillHistoryEntry};
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn plan_leads_with_the_selected_tracks_recommendation() {
        let catalog = Catalog::builtin().unwrap();
        let progress = UserProgress::default();
        let mut rng = StdRng::seed_from_u64(1);

        let plan = build_daily_plan(&catalog, &progress, today(), &mut rng);

        assert_eq!(plan.entries[0].drill_id, "focus_grid_basic");
        assert_eq!(plan.entries[0].reason, PlanReason::Recommended);
        assert!(!plan.entries[0].completed);
    }

    #[test]
    fn plan_never_repeats_a_drill() {
        let catalog = Catalog::builtin().unwrap();
        let progress = UserProgress::default();

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = build_daily_plan(&catalog, &progress, today(), &mut rng);

            assert!(!plan.entries.is_empty());
            assert!(plan.entries.len() <= 3);
            let mut ids: Vec<_> = plan.entries.iter().map(|e| &e.drill_id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), plan.entries.len());
        }
    }

    #[test]
    fn variety_comes_from_a_different_track() {
        let catalog = Catalog::builtin().unwrap();
        let progress = UserProgress::default();

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = build_daily_plan(&catalog, &progress, today(), &mut rng);

            if let Some(variety) = plan
                .entries
                .iter()
                .find(|e| e.reason == PlanReason::Variety)
            {
                let drill = catalog.drill(&variety.drill_id).unwrap();
                assert_ne!(drill.track_id, progress.selected_track_id);
            }
        }
    }

    #[test]
    fn streak_saver_offers_a_two_minute_drill() {
        let catalog = Catalog::builtin().unwrap();
        let progress = UserProgress::default();
        let mut rng = StdRng::seed_from_u64(3);

        let plan = build_daily_plan(&catalog, &progress, today(), &mut rng);

        let saver = plan
            .entries
            .iter()
            .find(|e| e.reason == PlanReason::StreakSaver)
            .expect("catalog offers two-minute drills");
        assert!(catalog
            .drill(&saver.drill_id)
            .unwrap()
            .supports_duration(STREAK_SAVER_MINUTES));
    }

    #[test]
    fn entries_reflect_todays_history() {
        let catalog = Catalog::builtin().unwrap();
        let mut progress = UserProgress::default();
        let noon = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        progress.drill_history.push(DrillHistoryEntry::new(
            "focus_grid_basic",
            80,
            2,
            Difficulty::Easy,
            3,
            noon,
        ));
        // Yesterday's completion of another drill must not count.
        progress.drill_history.push(DrillHistoryEntry::new(
            "plan_sprint_mind",
            90,
            3,
            Difficulty::Easy,
            2,
            noon - chrono::Duration::days(1),
        ));

        let mut rng = StdRng::seed_from_u64(5);
        let plan = build_daily_plan(&catalog, &progress, today(), &mut rng);

        assert!(plan.entries[0].completed);
        for entry in &plan.entries {
            if entry.drill_id == "plan_sprint_mind" {
                assert!(!entry.completed);
            }
        }
    }
}
