// src/models.rs

use crate::constants::*;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use uuid::Uuid;

// --- Game Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameType {
    FocusGrid,
    PlanSprint,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::FocusGrid => "focusGrid",
            GameType::PlanSprint => "planSprint",
        }
    }
}

// --- Difficulty ---

/// Difficulty tier with its gameplay tuning table.
///
/// Harder tiers never allow more mistakes and never have a lower score
/// multiplier than easier tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Base grid side length for Focus Grid rounds.
    pub fn base_grid_size(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 5,
            Difficulty::Hard => 6,
        }
    }

    /// Inclusive sequence-length range before level scaling.
    pub fn sequence_range(&self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (3, 4),
            Difficulty::Medium => (4, 5),
            Difficulty::Hard => (5, 6),
        }
    }

    pub fn min_sequence_length(&self) -> usize {
        self.sequence_range().0
    }

    /// Seconds each tile stays lit during the sequence preview.
    pub fn preview_duration(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.6,
            Difficulty::Medium => 0.45,
            Difficulty::Hard => 0.3,
        }
    }

    /// Base Focus Grid time budget in seconds, before per-tile extra time.
    pub fn base_time_limit(&self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 15,
            Difficulty::Hard => 12,
        }
    }

    pub fn allowed_mistakes(&self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 1,
            Difficulty::Hard => 0,
        }
    }

    pub fn score_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }

    /// Extra seconds of time budget granted per tile in the sequence.
    pub fn extra_time_per_tile(&self) -> f64 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Medium => 2.5,
            Difficulty::Hard => 2.0,
        }
    }

    /// Base Plan Sprint time budget in seconds.
    pub fn sprint_base_time(&self) -> u32 {
        match self {
            Difficulty::Easy => 90,
            Difficulty::Medium => 70,
            Difficulty::Hard => 50,
        }
    }

    /// Multiplier applied when converting a completed drill into ritual XP.
    pub fn xp_factor(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.2,
            Difficulty::Hard => 1.5,
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            _ => Ok(Difficulty::Medium), // Default fallback
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Catalog Data ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub icon: String,
    pub accent_color: String,
    pub secondary_accent_color: String,
    pub recommended_drill_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drill {
    pub id: String,
    pub title: String,
    pub track_id: String,
    pub game_type: GameType,
    pub duration_options: Vec<u32>,
    pub difficulty_levels: Vec<Difficulty>,
    pub short_description: String,
    pub long_description: String,
    pub how_it_helps: Vec<String>,
    pub levels: Vec<DrillLevel>,
    pub icon: String,
}

impl Drill {
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn supports_duration(&self, minutes: u32) -> bool {
        self.duration_options.contains(&minutes)
    }

    pub fn supports_difficulty(&self, difficulty: Difficulty) -> bool {
        self.difficulty_levels.contains(&difficulty)
    }
}

/// One precomputed level of a drill. Generated at catalog-build time and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillLevel {
    pub number: u32,
    pub target: u32,
    pub time_limit: u32,
    pub allowed_mistakes: u32,
    pub difficulty_multiplier: f64,
    pub sequence_length: usize,
    /// Grid side length. Zero for Plan Sprint levels, which have no grid.
    pub grid_size: usize,
}

// --- Plan Sprint Tasks ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Physical,
    Mental,
    Creative,
    Organizational,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskDuration {
    Quick,
    Medium,
    Long,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSprintTask {
    pub id: String,
    pub title: String,
    pub category: TaskCategory,
    pub energy_level: EnergyLevel,
    pub duration: TaskDuration,
    /// Ids of tasks in the same pool that should be ordered before this one.
    pub prerequisites: Vec<String>,
}

// --- Badges ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BadgeRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl BadgeRarity {
    pub fn display_name(&self) -> &'static str {
        match self {
            BadgeRarity::Common => "Common",
            BadgeRarity::Uncommon => "Uncommon",
            BadgeRarity::Rare => "Rare",
            BadgeRarity::Epic => "Epic",
            BadgeRarity::Legendary => "Legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeCriteriaKind {
    CompleteDrills,
    StreakDays,
    TotalMinutes,
    ScoreInDrill,
    CompleteLevelInGame,
    WeeklyDays,
    PerfectLevel,
    RitualLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeCriteria {
    pub kind: BadgeCriteriaKind,
    pub threshold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<GameType>,
}

impl BadgeCriteria {
    pub fn new(kind: BadgeCriteriaKind, threshold: u32) -> Self {
        BadgeCriteria {
            kind,
            threshold,
            drill_id: None,
            game_type: None,
        }
    }

    pub fn for_drill(kind: BadgeCriteriaKind, threshold: u32, drill_id: &str) -> Self {
        BadgeCriteria {
            kind,
            threshold,
            drill_id: Some(drill_id.to_string()),
            game_type: None,
        }
    }

    pub fn for_game(kind: BadgeCriteriaKind, threshold: u32, game_type: GameType) -> Self {
        BadgeCriteria {
            kind,
            threshold,
            drill_id: None,
            game_type: Some(game_type),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub criteria: BadgeCriteria,
    pub rarity: BadgeRarity,
    /// Set once when earned, never cleared afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Badge {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

// --- User Progress ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillHistoryEntry {
    pub id: Uuid,
    pub drill_id: String,
    pub completed_at: DateTime<Utc>,
    pub score: u32,
    pub duration: u32,
    pub difficulty: Difficulty,
    pub level_reached: u32,
}

impl DrillHistoryEntry {
    pub fn new(
        drill_id: &str,
        score: u32,
        duration: u32,
        difficulty: Difficulty,
        level_reached: u32,
        completed_at: DateTime<Utc>,
    ) -> Self {
        DrillHistoryEntry {
            id: Uuid::new_v4(),
            drill_id: drill_id.to_string(),
            completed_at,
            score,
            duration,
            difficulty,
            level_reached,
        }
    }
}

/// The persistent aggregate root. Mutated exclusively through the progress
/// ledger; persisted as a whole after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub selected_track_id: String,
    pub streak_days: u32,
    pub best_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
    pub total_minutes: u32,
    pub total_drills: u32,
    /// Minutes trained per calendar day. History is kept indefinitely; only
    /// the trailing seven days feed weekly statistics.
    pub heatmap: BTreeMap<NaiveDate, u32>,
    pub drill_history: Vec<DrillHistoryEntry>,
    pub drill_best_scores: BTreeMap<String, u32>,
    pub unlocked_badge_ids: BTreeSet<String>,
    pub ritual_level: u32,
    pub ritual_xp: u32,
    pub has_completed_onboarding: bool,
    pub tutorials_seen: BTreeSet<String>,
}

impl Default for UserProgress {
    fn default() -> Self {
        UserProgress {
            selected_track_id: DEFAULT_TRACK_ID.to_string(),
            streak_days: 0,
            best_streak: 0,
            last_completed_date: None,
            total_minutes: 0,
            total_drills: 0,
            heatmap: BTreeMap::new(),
            drill_history: Vec::new(),
            drill_best_scores: BTreeMap::new(),
            unlocked_badge_ids: BTreeSet::new(),
            ritual_level: 1,
            ritual_xp: 0,
            has_completed_onboarding: false,
            tutorials_seen: BTreeSet::new(),
        }
    }
}

impl UserProgress {
    /// Adds ritual XP and rederives the ritual level.
    /// Invariant: `ritual_level == ritual_xp / XP_PER_LEVEL + 1`.
    pub fn add_xp(&mut self, amount: u32) {
        self.ritual_xp += amount;
        let new_level = self.ritual_xp / XP_PER_LEVEL + 1;
        if new_level > self.ritual_level {
            self.ritual_level = new_level;
        }
    }

    pub fn xp_to_next_level(&self) -> u32 {
        XP_PER_LEVEL - self.ritual_xp % XP_PER_LEVEL
    }

    /// Fraction of the way to the next ritual level, in [0, 1).
    pub fn level_progress(&self) -> f64 {
        f64::from(self.ritual_xp % XP_PER_LEVEL) / f64::from(XP_PER_LEVEL)
    }

    /// Applies a completion on `today` to the consecutive-day streak.
    ///
    /// Same-day repeats leave the streak untouched, a one-day gap extends
    /// it, anything longer resets it to 1.
    pub fn update_streak(&mut self, today: NaiveDate) {
        match self.last_completed_date {
            Some(last) => {
                let gap = (today - last).num_days();
                if gap == 1 {
                    self.streak_days += 1;
                } else if gap != 0 {
                    self.streak_days = 1;
                }
            }
            None => self.streak_days = 1,
        }

        self.last_completed_date = Some(today);

        if self.streak_days > self.best_streak {
            self.best_streak = self.streak_days;
        }
    }

    pub fn record_heatmap(&mut self, today: NaiveDate, minutes: u32) {
        *self.heatmap.entry(today).or_insert(0) += minutes;
    }

    pub fn heatmap_minutes(&self, date: NaiveDate) -> u32 {
        self.heatmap.get(&date).copied().unwrap_or(0)
    }

    /// Minutes trained in the trailing seven days, `today` inclusive.
    pub fn weekly_total(&self, today: NaiveDate) -> u32 {
        (0..HEATMAP_WINDOW_DAYS)
            .map(|i| self.heatmap_minutes(today - Duration::days(i)))
            .sum()
    }

    /// Distinct days with any training in the trailing seven days.
    pub fn days_active_this_week(&self, today: NaiveDate) -> u32 {
        (0..HEATMAP_WINDOW_DAYS)
            .filter(|&i| self.heatmap_minutes(today - Duration::days(i)) > 0)
            .count() as u32
    }
}

// --- Daily Plan ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanReason {
    Recommended,
    Variety,
    StreakSaver,
}

impl PlanReason {
    pub fn label(&self) -> &'static str {
        match self {
            PlanReason::Recommended => "Recommended for your track",
            PlanReason::Variety => "Build variety",
            PlanReason::StreakSaver => "Quick streak saver",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedDrill {
    pub drill_id: String,
    pub reason: PlanReason,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub entries: Vec<PlannedDrill>,
}

impl DailyPlan {
    /// Flips the completed flag of the matching entry in place. Entries are
    /// never removed or reordered. Returns false if the drill is not planned.
    pub fn mark_completed(&mut self, drill_id: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.drill_id == drill_id) {
            Some(entry) => {
                entry.completed = true;
                true
            }
            None => false,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.completed).count()
    }

    pub fn completion_fraction(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.entries.len() as f64
    }

    pub fn has_completed_any(&self) -> bool {
        self.completed_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_tuning_is_monotonic() {
        for pair in Difficulty::ALL.windows(2) {
            let (easier, harder) = (pair[0], pair[1]);
            assert!(harder.allowed_mistakes() <= easier.allowed_mistakes());
            assert!(harder.score_multiplier() >= easier.score_multiplier());
        }
    }

    #[test]
    fn xp_level_invariant_holds_across_additions() {
        let mut progress = UserProgress::default();
        for amount in [12, 5, 88, 250, 1, 99] {
            progress.add_xp(amount);
            assert_eq!(progress.ritual_level, progress.ritual_xp / XP_PER_LEVEL + 1);
        }
    }

    #[test]
    fn streak_extends_on_consecutive_days() {
        let mut progress = UserProgress::default();
        let day1 = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        progress.update_streak(day1);
        assert_eq!(progress.streak_days, 1);

        progress.update_streak(day1 + Duration::days(1));
        assert_eq!(progress.streak_days, 2);

        // Same-day repeat leaves the streak alone.
        progress.update_streak(day1 + Duration::days(1));
        assert_eq!(progress.streak_days, 2);

        // A gap resets it.
        progress.update_streak(day1 + Duration::days(4));
        assert_eq!(progress.streak_days, 1);
        assert_eq!(progress.best_streak, 2);
    }

    #[test]
    fn weekly_stats_only_count_the_trailing_window() {
        let mut progress = UserProgress::default();
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        progress.record_heatmap(today, 6);
        progress.record_heatmap(today - Duration::days(6), 4);
        progress.record_heatmap(today - Duration::days(7), 30); // outside window

        assert_eq!(progress.weekly_total(today), 10);
        assert_eq!(progress.days_active_this_week(today), 2);
    }

    #[test]
    fn plan_marks_single_entry_in_place() {
        let mut plan = DailyPlan {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            entries: vec![
                PlannedDrill {
                    drill_id: "a".into(),
                    reason: PlanReason::Recommended,
                    completed: false,
                },
                PlannedDrill {
                    drill_id: "b".into(),
                    reason: PlanReason::Variety,
                    completed: false,
                },
            ],
        };

        assert!(plan.mark_completed("b"));
        assert!(!plan.mark_completed("missing"));
        assert_eq!(plan.completed_count(), 1);
        assert_eq!(plan.entries[0].drill_id, "a");
        assert!(plan.entries[1].completed);
    }
}
