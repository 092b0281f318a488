// src/progress.rs

//! Progress ledger: accumulates history and turns completed drills into
//! streaks, XP, heatmap entries and badge unlocks.
//!
//! `record_completion` is the single write path for gameplay results. It
//! applies every dependent update (history, totals, best scores, streak,
//! heatmap, XP, badges) as one logical transaction and persists the full
//! snapshot afterwards, so observers never see a partially applied result.

use crate::catalog::Catalog;
use crate::constants::*;
use crate::models::{
    Badge, BadgeCriteriaKind, Difficulty, DrillHistoryEntry, Track, UserProgress,
};
use crate::store::ProgressStore;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error, info, warn};

/// One finished drill session, as reported by the presentation layer.
#[derive(Debug, Clone)]
pub struct Completion {
    pub drill_id: String,
    pub score: u32,
    pub duration_minutes: u32,
    pub difficulty: Difficulty,
    pub level_reached: u32,
    pub was_perfect: bool,
}

pub struct ProgressLedger<S: ProgressStore> {
    store: S,
    progress: UserProgress,
    badges: Vec<Badge>,
}

impl<S: ProgressStore> ProgressLedger<S> {
    /// Loads persisted progress, falling back to fresh defaults when the
    /// store has no usable prior state. Previously earned badges are
    /// re-stamped as unlocked; only their ids persist.
    pub fn load(store: S, catalog: &Catalog) -> Self {
        let progress = store.load().unwrap_or_default();
        let mut badges = catalog.badges().to_vec();

        let now = Utc::now();
        for badge in &mut badges {
            if progress.unlocked_badge_ids.contains(&badge.id) {
                badge.unlocked_at = Some(now);
            }
        }

        info!(
            "Progress loaded: {} drills, streak {}, ritual level {}, {} badges unlocked",
            progress.total_drills,
            progress.streak_days,
            progress.ritual_level,
            progress.unlocked_badge_ids.len()
        );

        ProgressLedger {
            store,
            progress,
            badges,
        }
    }

    // --- Recording completions ---

    pub fn record_completion(&mut self, catalog: &Catalog, completion: Completion) {
        self.record_completion_at(catalog, completion, Utc::now());
    }

    /// Applies a completion as of the given instant. Exposed so callers
    /// with their own clock (and tests) can pin the date.
    pub fn record_completion_at(
        &mut self,
        catalog: &Catalog,
        completion: Completion,
        now: DateTime<Utc>,
    ) {
        let today = now.date_naive();

        self.progress.drill_history.push(DrillHistoryEntry::new(
            &completion.drill_id,
            completion.score,
            completion.duration_minutes,
            completion.difficulty,
            completion.level_reached,
            now,
        ));
        self.progress.total_drills += 1;
        self.progress.total_minutes += completion.duration_minutes;

        // Best score must be current before badges are evaluated.
        let best = self
            .progress
            .drill_best_scores
            .entry(completion.drill_id.clone())
            .or_insert(completion.score);
        if completion.score > *best {
            *best = completion.score;
        }

        self.progress.update_streak(today);
        self.progress
            .record_heatmap(today, completion.duration_minutes);

        let xp = xp_for(
            completion.score,
            completion.duration_minutes,
            completion.difficulty,
        );
        self.progress.add_xp(xp);

        info!(
            "Completion recorded: drill={} score={} level={} (+{} XP, streak {})",
            completion.drill_id, completion.score, completion.level_reached, xp,
            self.progress.streak_days
        );

        self.evaluate_badges(catalog, &completion, today, now);
        self.persist();
    }

    fn evaluate_badges(
        &mut self,
        catalog: &Catalog,
        completion: &Completion,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) {
        let completed_game = catalog.drill(&completion.drill_id).map(|d| d.game_type);

        for badge in &mut self.badges {
            if badge.is_unlocked() {
                continue;
            }

            let criteria = &badge.criteria;
            let threshold = criteria.threshold;
            let earned = match criteria.kind {
                BadgeCriteriaKind::CompleteDrills => self.progress.total_drills >= threshold,
                BadgeCriteriaKind::StreakDays => self.progress.streak_days >= threshold,
                BadgeCriteriaKind::TotalMinutes => self.progress.total_minutes >= threshold,
                BadgeCriteriaKind::ScoreInDrill => match &criteria.drill_id {
                    Some(target) => {
                        (completion.drill_id == *target && completion.score >= threshold)
                            || self
                                .progress
                                .drill_best_scores
                                .get(target)
                                .is_some_and(|best| *best >= threshold)
                    }
                    None => false,
                },
                BadgeCriteriaKind::CompleteLevelInGame => {
                    criteria.game_type.is_some()
                        && completed_game == criteria.game_type
                        && completion.level_reached >= threshold
                }
                BadgeCriteriaKind::WeeklyDays => {
                    self.progress.days_active_this_week(today) >= threshold
                }
                BadgeCriteriaKind::PerfectLevel => completion.was_perfect,
                BadgeCriteriaKind::RitualLevel => self.progress.ritual_level >= threshold,
            };

            if earned {
                badge.unlocked_at = Some(now);
                self.progress.unlocked_badge_ids.insert(badge.id.clone());
                info!("Badge unlocked: {} ({})", badge.title, badge.id);
            }
        }
    }

    // --- Other mutations ---

    /// Replaces all progress with fresh defaults and re-locks every badge.
    pub fn reset_progress(&mut self, catalog: &Catalog) {
        self.progress = UserProgress::default();
        self.badges = catalog.badges().to_vec();
        info!("Progress reset to defaults");
        self.persist();
    }

    pub fn select_track(&mut self, catalog: &Catalog, track_id: &str) {
        if catalog.track(track_id).is_none() {
            warn!("Ignoring selection of unknown track `{}`", track_id);
            return;
        }
        self.progress.selected_track_id = track_id.to_string();
        self.persist();
    }

    pub fn complete_onboarding(&mut self) {
        self.progress.has_completed_onboarding = true;
        self.persist();
    }

    pub fn mark_tutorial_seen(&mut self, tutorial_id: &str) {
        if self.progress.tutorials_seen.insert(tutorial_id.to_string()) {
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.progress) {
            // Storage trouble never stalls gameplay; the next save carries
            // the full snapshot.
            error!("Failed to persist progress: {}", err);
        } else {
            debug!("Progress persisted");
        }
    }

    // --- Read-only accessors ---

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn unlocked_badges(&self) -> Vec<&Badge> {
        self.badges.iter().filter(|b| b.is_unlocked()).collect()
    }

    pub fn locked_badges(&self) -> Vec<&Badge> {
        self.badges.iter().filter(|b| !b.is_unlocked()).collect()
    }

    pub fn best_score(&self, drill_id: &str) -> Option<u32> {
        self.progress.drill_best_scores.get(drill_id).copied()
    }

    pub fn has_seen_tutorial(&self, tutorial_id: &str) -> bool {
        self.progress.tutorials_seen.contains(tutorial_id)
    }

    pub fn current_track<'c>(&self, catalog: &'c Catalog) -> Option<&'c Track> {
        catalog.track(&self.progress.selected_track_id)
    }

    pub fn weekly_total(&self) -> u32 {
        self.progress.weekly_total(Utc::now().date_naive())
    }

    pub fn days_active_this_week(&self) -> u32 {
        self.progress.days_active_this_week(Utc::now().date_naive())
    }
}

/// XP earned for a completion: score and minutes trained, weighted by the
/// difficulty factor, never less than the participation minimum.
fn xp_for(score: u32, duration_minutes: u32, difficulty: Difficulty) -> u32 {
    let raw = (f64::from(score) / XP_SCORE_DIVISOR
        + f64::from(duration_minutes * XP_PER_MINUTE))
        * difficulty.xp_factor();
    (raw.round() as u32).max(XP_MIN_PER_DRILL)
}
