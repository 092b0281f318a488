// src/catalog.rs

//! Static content catalog: tracks, drills, badges and task pools.
//!
//! Built once at startup and validated fail-fast; the content is compiled in,
//! so a malformed catalog is a programming error, not a runtime condition.

use crate::constants::MAX_LEVEL;
use crate::models::{
    Badge, BadgeCriteria, BadgeCriteriaKind, BadgeRarity, Difficulty, Drill, DrillLevel,
    EnergyLevel, GameType, PlanSprintTask, TaskCategory, TaskDuration, Track,
};
use crate::rules::{self, RuleKind};
use log::debug;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate id `{0}` in catalog")]
    DuplicateId(String),
    #[error("drill `{drill}` references unknown track `{track}`")]
    UnknownTrack { drill: String, track: String },
    #[error("track `{track}` recommends unknown drill `{drill}`")]
    UnknownRecommendedDrill { track: String, drill: String },
    #[error("drill `{drill}` has no {what}")]
    EmptyOptions { drill: String, what: &'static str },
    #[error("drill `{drill}` levels are not numbered contiguously from 1")]
    BadLevelNumbering { drill: String },
    #[error("drill `{drill}` level {level} has a difficulty multiplier below 1.0")]
    BadMultiplier { drill: String, level: u32 },
    #[error("task `{task}` in the {theme} pool references unknown prerequisite `{prereq}`")]
    UnknownPrerequisite {
        theme: &'static str,
        task: String,
        prereq: String,
    },
    #[error("badge `{badge}` is missing its {what} scope")]
    MissingScope { badge: String, what: &'static str },
    #[error("badge `{badge}` references unknown drill `{drill}`")]
    UnknownBadgeDrill { badge: String, drill: String },
}

// --- Task Themes ---

/// Which task pool a Plan Sprint drill draws from, derived from its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskTheme {
    General,
    Body,
    Order,
}

impl TaskTheme {
    pub fn for_track(track_id: &str) -> TaskTheme {
        match track_id {
            "body" => TaskTheme::Body,
            "order" => TaskTheme::Order,
            _ => TaskTheme::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskTheme::General => "general",
            TaskTheme::Body => "body",
            TaskTheme::Order => "order",
        }
    }
}

// --- Catalog ---

#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
    drills: Vec<Drill>,
    badges: Vec<Badge>,
    task_pools: HashMap<TaskTheme, Vec<PlanSprintTask>>,
}

impl Catalog {
    /// Builds and validates the compiled-in content set.
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalog = Catalog {
            tracks: seed_tracks(),
            drills: seed_drills(),
            badges: seed_badges(),
            task_pools: seed_task_pools(),
        };
        validate(
            &catalog.tracks,
            &catalog.drills,
            &catalog.badges,
            &catalog.task_pools,
        )?;
        debug!(
            "Catalog loaded: {} tracks, {} drills, {} badges, {} task pools",
            catalog.tracks.len(),
            catalog.drills.len(),
            catalog.badges.len(),
            catalog.task_pools.len()
        );
        Ok(catalog)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn drills(&self) -> &[Drill] {
        &self.drills
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn drill(&self, id: &str) -> Option<&Drill> {
        self.drills.iter().find(|d| d.id == id)
    }

    /// Drills offering the given duration option, in catalog order. May be
    /// empty; callers are expected to handle "no matching drill".
    pub fn drills_with_duration(&self, minutes: u32) -> Vec<&Drill> {
        self.drills
            .iter()
            .filter(|d| d.supports_duration(minutes))
            .collect()
    }

    pub fn tasks_for_theme(&self, theme: TaskTheme) -> &[PlanSprintTask] {
        self.task_pools.get(&theme).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ordering rules active at `level`. The order matters for display only;
    /// scoring averages over the set.
    pub fn rules_for_level(&self, level: u32) -> Vec<RuleKind> {
        rules::rules_for_level(level)
    }
}

// --- Validation ---

fn validate(
    tracks: &[Track],
    drills: &[Drill],
    badges: &[Badge],
    task_pools: &HashMap<TaskTheme, Vec<PlanSprintTask>>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in tracks
        .iter()
        .map(|t| &t.id)
        .chain(drills.iter().map(|d| &d.id))
        .chain(badges.iter().map(|b| &b.id))
    {
        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateId(id.clone()));
        }
    }

    let track_ids: HashSet<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    let drill_ids: HashSet<&str> = drills.iter().map(|d| d.id.as_str()).collect();

    for drill in drills {
        if !track_ids.contains(drill.track_id.as_str()) {
            return Err(CatalogError::UnknownTrack {
                drill: drill.id.clone(),
                track: drill.track_id.clone(),
            });
        }
        if drill.duration_options.is_empty() {
            return Err(CatalogError::EmptyOptions {
                drill: drill.id.clone(),
                what: "duration options",
            });
        }
        if drill.difficulty_levels.is_empty() {
            return Err(CatalogError::EmptyOptions {
                drill: drill.id.clone(),
                what: "difficulty tiers",
            });
        }
        for (i, level) in drill.levels.iter().enumerate() {
            if level.number != i as u32 + 1 {
                return Err(CatalogError::BadLevelNumbering {
                    drill: drill.id.clone(),
                });
            }
            if level.difficulty_multiplier < 1.0 {
                return Err(CatalogError::BadMultiplier {
                    drill: drill.id.clone(),
                    level: level.number,
                });
            }
        }
    }

    for track in tracks {
        for drill_id in &track.recommended_drill_ids {
            if !drill_ids.contains(drill_id.as_str()) {
                return Err(CatalogError::UnknownRecommendedDrill {
                    track: track.id.clone(),
                    drill: drill_id.clone(),
                });
            }
        }
    }

    for (theme, pool) in task_pools {
        let pool_ids: HashSet<&str> = pool.iter().map(|t| t.id.as_str()).collect();
        if pool_ids.len() != pool.len() {
            return Err(CatalogError::DuplicateId(format!(
                "task pool {}",
                theme.as_str()
            )));
        }
        for task in pool {
            for prereq in &task.prerequisites {
                if !pool_ids.contains(prereq.as_str()) {
                    return Err(CatalogError::UnknownPrerequisite {
                        theme: theme.as_str(),
                        task: task.id.clone(),
                        prereq: prereq.clone(),
                    });
                }
            }
        }
    }

    for badge in badges {
        match badge.criteria.kind {
            BadgeCriteriaKind::ScoreInDrill => match &badge.criteria.drill_id {
                Some(drill_id) => {
                    if !drill_ids.contains(drill_id.as_str()) {
                        return Err(CatalogError::UnknownBadgeDrill {
                            badge: badge.id.clone(),
                            drill: drill_id.clone(),
                        });
                    }
                }
                None => {
                    return Err(CatalogError::MissingScope {
                        badge: badge.id.clone(),
                        what: "drill",
                    })
                }
            },
            BadgeCriteriaKind::CompleteLevelInGame => {
                if badge.criteria.game_type.is_none() {
                    return Err(CatalogError::MissingScope {
                        badge: badge.id.clone(),
                        what: "game type",
                    });
                }
            }
            _ => {}
        }
    }

    Ok(())
}

// --- Level Generators ---

/// Focus Grid level table: ten levels with rising targets, shrinking time
/// limits and growing grids/sequences.
fn focus_grid_levels(advanced: bool) -> Vec<DrillLevel> {
    let base_grid: usize = if advanced { 5 } else { 4 };
    let base_sequence: usize = if advanced { 4 } else { 3 };

    (1..=MAX_LEVEL)
        .map(|i| DrillLevel {
            number: i,
            target: 100 + i * 20,
            time_limit: (15 - i as i64).max(8) as u32,
            allowed_mistakes: (2 - i as i64 / 4).max(0) as u32,
            difficulty_multiplier: 1.0 + f64::from(i - 1) * 0.15,
            sequence_length: (base_sequence + (i as usize - 1) / 2).min(8),
            grid_size: (base_grid + (i as usize - 1) / 4).min(6),
        })
        .collect()
}

/// Plan Sprint level table. `target` is the task-count goal; there is no
/// grid, and the sequence length is unused by scoring.
fn plan_sprint_levels(advanced: bool) -> Vec<DrillLevel> {
    let base_task_count: u32 = if advanced { 8 } else { 6 };

    (1..=MAX_LEVEL)
        .map(|i| DrillLevel {
            number: i,
            target: (base_task_count + (i - 1) / 2).min(14),
            time_limit: (45 - i as i64 * 2).max(20) as u32,
            allowed_mistakes: 0,
            difficulty_multiplier: 1.0 + f64::from(i - 1) * 0.1,
            sequence_length: 1 + i as usize / 4,
            grid_size: 0,
        })
        .collect()
}

// --- Seed Data ---

fn seed_tracks() -> Vec<Track> {
    vec![
        Track {
            id: "focus".into(),
            title: "Focus".into(),
            subtitle: "Attention & Impulse Control".into(),
            description: "Train your ability to concentrate, resist distractions, and maintain deep focus for longer periods. Perfect for improving work sessions and reducing scattered thinking.".into(),
            icon: "eye.fill".into(),
            accent_color: "AccentA".into(),
            secondary_accent_color: "AccentB".into(),
            recommended_drill_ids: vec!["focus_grid_basic".into(), "focus_grid_advanced".into()],
        },
        Track {
            id: "body".into(),
            title: "Body".into(),
            subtitle: "Physical Discipline & Energy".into(),
            description: "Build habits around movement, posture, and physical awareness. These drills help you stay energized and maintain body-mind connection throughout the day.".into(),
            icon: "figure.run".into(),
            accent_color: "AccentB".into(),
            secondary_accent_color: "Success".into(),
            recommended_drill_ids: vec!["plan_sprint_body".into(), "focus_grid_basic".into()],
        },
        Track {
            id: "mind".into(),
            title: "Mind".into(),
            subtitle: "Mental Clarity & Planning".into(),
            description: "Strengthen your planning abilities, decision-making, and mental organization. Learn to prioritize effectively and think clearly under pressure.".into(),
            icon: "brain.head.profile.fill".into(),
            accent_color: "AccentC".into(),
            secondary_accent_color: "AccentA".into(),
            recommended_drill_ids: vec!["plan_sprint_mind".into(), "plan_sprint_advanced".into()],
        },
        Track {
            id: "order".into(),
            title: "Order".into(),
            subtitle: "Consistency & Systems".into(),
            description: "Master the art of routine and systematic thinking. Build reliable habits and create order in your daily life through consistent practice.".into(),
            icon: "square.stack.3d.up.fill".into(),
            accent_color: "Success".into(),
            secondary_accent_color: "AccentB".into(),
            recommended_drill_ids: vec!["plan_sprint_order".into(), "focus_grid_advanced".into()],
        },
    ]
}

fn seed_drills() -> Vec<Drill> {
    vec![
        Drill {
            id: "focus_grid_basic".into(),
            title: "Focus Grid".into(),
            track_id: "focus".into(),
            game_type: GameType::FocusGrid,
            duration_options: vec![2, 3, 5],
            difficulty_levels: vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard],
            short_description: "Remember and repeat visual sequences".into(),
            long_description: "Focus Grid challenges your visual memory and attention control. Watch tiles light up in sequence, then repeat the pattern. As you progress, sequences get longer and faster, training your brain to hold more information while resisting the urge to guess.".into(),
            how_it_helps: vec![
                "Improves working memory capacity".into(),
                "Builds impulse control by requiring patience".into(),
                "Trains sustained attention over short bursts".into(),
                "Reduces mental wandering during tasks".into(),
            ],
            levels: focus_grid_levels(false),
            icon: "square.grid.3x3.fill".into(),
        },
        Drill {
            id: "focus_grid_advanced".into(),
            title: "Focus Grid Pro".into(),
            track_id: "focus".into(),
            game_type: GameType::FocusGrid,
            duration_options: vec![3, 5],
            difficulty_levels: vec![Difficulty::Medium, Difficulty::Hard],
            short_description: "Advanced pattern recognition".into(),
            long_description: "A more challenging version of Focus Grid with larger grids, faster sequences, and stricter timing. Designed for those who have mastered the basics and want to push their focus limits.".into(),
            how_it_helps: vec![
                "Expands visual processing speed".into(),
                "Develops expert-level pattern recognition".into(),
                "Builds confidence under time pressure".into(),
                "Creates mental resilience".into(),
            ],
            levels: focus_grid_levels(true),
            icon: "square.grid.4x3.fill".into(),
        },
        Drill {
            id: "plan_sprint_mind".into(),
            title: "Plan Sprint".into(),
            track_id: "mind".into(),
            game_type: GameType::PlanSprint,
            duration_options: vec![2, 3, 5],
            difficulty_levels: vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard],
            short_description: "Organize tasks by priority".into(),
            long_description: "Plan Sprint trains your ability to sequence activities effectively. Given a list of micro-tasks and ordering rules, arrange them in the optimal order before time runs out. Learn to think systematically about task dependencies and energy management.".into(),
            how_it_helps: vec![
                "Develops systematic thinking".into(),
                "Improves decision-making speed".into(),
                "Builds intuition for task prioritization".into(),
                "Reduces overwhelm when facing multiple tasks".into(),
            ],
            levels: plan_sprint_levels(false),
            icon: "list.bullet.rectangle.fill".into(),
        },
        Drill {
            id: "plan_sprint_body".into(),
            title: "Body Planner".into(),
            track_id: "body".into(),
            game_type: GameType::PlanSprint,
            duration_options: vec![2, 3],
            difficulty_levels: vec![Difficulty::Easy, Difficulty::Medium],
            short_description: "Sequence physical activities".into(),
            long_description: "Apply planning skills to physical routines. Arrange warm-ups, exercises, and cool-downs in the right order. Learn how proper sequencing maximizes energy and prevents injury.".into(),
            how_it_helps: vec![
                "Teaches proper workout sequencing".into(),
                "Builds awareness of body preparation".into(),
                "Connects mental planning to physical action".into(),
                "Creates sustainable exercise habits".into(),
            ],
            levels: plan_sprint_levels(false),
            icon: "figure.walk".into(),
        },
        Drill {
            id: "plan_sprint_order".into(),
            title: "Order Builder".into(),
            track_id: "order".into(),
            game_type: GameType::PlanSprint,
            duration_options: vec![3, 5],
            difficulty_levels: vec![Difficulty::Medium, Difficulty::Hard],
            short_description: "Create optimal daily routines".into(),
            long_description: "Master the art of daily routine design. Arrange morning, afternoon, and evening tasks considering energy levels, dependencies, and efficiency. Build the mental framework for consistent daily systems.".into(),
            how_it_helps: vec![
                "Strengthens routine-building skills".into(),
                "Develops time-blocking intuition".into(),
                "Teaches energy management principles".into(),
                "Creates foundation for lasting habits".into(),
            ],
            levels: plan_sprint_levels(false),
            icon: "calendar.badge.clock".into(),
        },
        Drill {
            id: "plan_sprint_advanced".into(),
            title: "Sprint Master".into(),
            track_id: "mind".into(),
            game_type: GameType::PlanSprint,
            duration_options: vec![5],
            difficulty_levels: vec![Difficulty::Hard],
            short_description: "Complex multi-constraint planning".into(),
            long_description: "The ultimate planning challenge. Handle multiple simultaneous constraints, longer task lists, and tighter time limits. For those who want to develop elite-level planning abilities.".into(),
            how_it_helps: vec![
                "Builds expert-level sequencing skills".into(),
                "Develops multi-constraint reasoning".into(),
                "Creates calm under planning pressure".into(),
                "Prepares for complex real-world decisions".into(),
            ],
            levels: plan_sprint_levels(true),
            icon: "bolt.fill".into(),
        },
    ]
}

fn badge(
    id: &str,
    title: &str,
    description: &str,
    icon: &str,
    criteria: BadgeCriteria,
    rarity: BadgeRarity,
) -> Badge {
    Badge {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        criteria,
        rarity,
        unlocked_at: None,
    }
}

fn seed_badges() -> Vec<Badge> {
    use BadgeCriteriaKind::*;
    vec![
        badge(
            "first_spark",
            "First Spark",
            "Complete your first drill and begin your discipline journey",
            "sparkle",
            BadgeCriteria::new(CompleteDrills, 1),
            BadgeRarity::Common,
        ),
        badge(
            "two_day_temper",
            "Two-Day Temper",
            "Maintain a 2-day practice streak",
            "flame",
            BadgeCriteria::new(StreakDays, 2),
            BadgeRarity::Common,
        ),
        badge(
            "seven_day_steel",
            "Seven-Day Steel",
            "Maintain a 7-day practice streak",
            "flame.fill",
            BadgeCriteria::new(StreakDays, 7),
            BadgeRarity::Rare,
        ),
        badge(
            "fourteen_day_iron",
            "Fourteen-Day Iron",
            "Maintain a 14-day practice streak",
            "bolt.shield.fill",
            BadgeCriteria::new(StreakDays, 14),
            BadgeRarity::Epic,
        ),
        badge(
            "thirty_day_diamond",
            "Thirty-Day Diamond",
            "Maintain a 30-day practice streak",
            "crown.fill",
            BadgeCriteria::new(StreakDays, 30),
            BadgeRarity::Legendary,
        ),
        badge(
            "focused_hands",
            "Focused Hands",
            "Score 80+ points in Focus Grid",
            "hand.raised.fill",
            BadgeCriteria::for_drill(ScoreInDrill, 80, "focus_grid_basic"),
            BadgeRarity::Uncommon,
        ),
        badge(
            "eagle_eye",
            "Eagle Eye",
            "Score 150+ points in Focus Grid Pro",
            "eye.circle.fill",
            BadgeCriteria::for_drill(ScoreInDrill, 150, "focus_grid_advanced"),
            BadgeRarity::Rare,
        ),
        badge(
            "planners_pulse",
            "Planner's Pulse",
            "Complete level 5 in Plan Sprint",
            "heart.circle.fill",
            BadgeCriteria::for_game(CompleteLevelInGame, 5, GameType::PlanSprint),
            BadgeRarity::Uncommon,
        ),
        badge(
            "master_planner",
            "Master Planner",
            "Complete level 10 in Plan Sprint",
            "star.circle.fill",
            BadgeCriteria::for_game(CompleteLevelInGame, 10, GameType::PlanSprint),
            BadgeRarity::Epic,
        ),
        badge(
            "consistency_core",
            "Consistency Core",
            "Complete 20 drills total",
            "arrow.triangle.2.circlepath",
            BadgeCriteria::new(CompleteDrills, 20),
            BadgeRarity::Uncommon,
        ),
        badge(
            "drill_devotee",
            "Drill Devotee",
            "Complete 50 drills total",
            "arrow.triangle.2.circlepath.circle.fill",
            BadgeCriteria::new(CompleteDrills, 50),
            BadgeRarity::Rare,
        ),
        badge(
            "heat_keeper",
            "Heat Keeper",
            "Practice on 5 different days in a single week",
            "thermometer.sun.fill",
            BadgeCriteria::new(WeeklyDays, 5),
            BadgeRarity::Uncommon,
        ),
        badge(
            "perfect_week",
            "Perfect Week",
            "Practice every day for a full week",
            "checkmark.seal.fill",
            BadgeCriteria::new(WeeklyDays, 7),
            BadgeRarity::Rare,
        ),
        badge(
            "calm_under_timer",
            "Calm Under Timer",
            "Complete a timed level with zero mistakes",
            "timer.circle.fill",
            BadgeCriteria::new(PerfectLevel, 1),
            BadgeRarity::Uncommon,
        ),
        badge(
            "ritual_level_5",
            "Ritual Adept",
            "Reach Ritual Level 5",
            "5.circle.fill",
            BadgeCriteria::new(RitualLevel, 5),
            BadgeRarity::Uncommon,
        ),
        badge(
            "ritual_level_10",
            "Ritual Master",
            "Reach Ritual Level 10",
            "10.circle.fill",
            BadgeCriteria::new(RitualLevel, 10),
            BadgeRarity::Rare,
        ),
        badge(
            "hour_invested",
            "Hour Invested",
            "Spend 60 minutes total in training",
            "clock.fill",
            BadgeCriteria::new(TotalMinutes, 60),
            BadgeRarity::Uncommon,
        ),
        badge(
            "time_master",
            "Time Master",
            "Spend 300 minutes total in training",
            "clock.badge.checkmark.fill",
            BadgeCriteria::new(TotalMinutes, 300),
            BadgeRarity::Epic,
        ),
    ]
}

fn sprint_task(
    id: &str,
    title: &str,
    category: TaskCategory,
    energy: EnergyLevel,
    duration: TaskDuration,
    prerequisites: &[&str],
) -> PlanSprintTask {
    PlanSprintTask {
        id: id.to_string(),
        title: title.to_string(),
        category,
        energy_level: energy,
        duration,
        prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
    }
}

fn seed_task_pools() -> HashMap<TaskTheme, Vec<PlanSprintTask>> {
    use EnergyLevel::*;
    use TaskCategory::*;
    use TaskDuration::{Long, Medium as Mid, Quick};

    let mut pools = HashMap::new();

    pools.insert(
        TaskTheme::General,
        vec![
            sprint_task("check_email", "Check email", Organizational, Low, Quick, &[]),
            sprint_task("write_notes", "Write 3 key notes", Mental, Medium, Quick, &[]),
            sprint_task("clear_desk", "Clear desk", Organizational, Low, Quick, &[]),
            sprint_task("deep_work", "Deep work session", Mental, High, Long, &["clear_desk"]),
            sprint_task("quick_stretch", "Quick stretch", Physical, Low, Quick, &[]),
            sprint_task("review_goals", "Review daily goals", Mental, Medium, Quick, &[]),
            sprint_task("plan_tomorrow", "Plan tomorrow", Organizational, Low, Mid, &[]),
            sprint_task(
                "creative_brainstorm",
                "Creative brainstorm",
                Creative,
                High,
                Mid,
                &["review_goals"],
            ),
            sprint_task("file_documents", "File documents", Organizational, Low, Quick, &[]),
            sprint_task("focus_break", "Focus break", Physical, Low, Quick, &["deep_work"]),
            sprint_task(
                "reply_messages",
                "Reply to messages",
                Organizational,
                Medium,
                Mid,
                &["check_email"],
            ),
            sprint_task("learn_something", "Learn something new", Mental, High, Mid, &[]),
            sprint_task("water_plants", "Water plants", Organizational, Low, Quick, &[]),
            sprint_task("meditate", "5-min meditation", Mental, Low, Quick, &[]),
        ],
    );

    pools.insert(
        TaskTheme::Body,
        vec![
            sprint_task("warmup", "Warm up joints", Physical, Low, Quick, &[]),
            sprint_task("cardio", "Cardio burst", Physical, High, Mid, &["warmup"]),
            sprint_task("strength", "Strength set", Physical, High, Mid, &["warmup"]),
            sprint_task(
                "cooldown",
                "Cool down stretch",
                Physical,
                Low,
                Quick,
                &["cardio", "strength"],
            ),
            sprint_task("hydrate", "Hydrate well", Physical, Low, Quick, &[]),
            sprint_task("posture_check", "Posture check", Physical, Low, Quick, &[]),
            sprint_task("walk", "10-min walk", Physical, Medium, Mid, &[]),
            sprint_task("balance", "Balance exercise", Physical, Medium, Quick, &["warmup"]),
            sprint_task("breathing", "Deep breathing", Physical, Low, Quick, &[]),
            sprint_task("foam_roll", "Foam rolling", Physical, Low, Mid, &["cooldown"]),
        ],
    );

    pools.insert(
        TaskTheme::Order,
        vec![
            sprint_task("morning_routine", "Morning routine", Organizational, Medium, Mid, &[]),
            sprint_task("inbox_zero", "Inbox zero", Organizational, Medium, Mid, &[]),
            sprint_task("meal_prep", "Meal prep", Organizational, Medium, Long, &[]),
            sprint_task("weekly_review", "Weekly review", Organizational, High, Long, &[]),
            sprint_task("tidy_space", "Tidy workspace", Organizational, Low, Quick, &[]),
            sprint_task("backup_files", "Backup files", Organizational, Low, Quick, &[]),
            sprint_task("update_calendar", "Update calendar", Organizational, Low, Quick, &[]),
            sprint_task("declutter", "Declutter drawer", Organizational, Medium, Mid, &[]),
            sprint_task(
                "set_reminders",
                "Set reminders",
                Organizational,
                Low,
                Quick,
                &["update_calendar"],
            ),
            sprint_task("evening_review", "Evening review", Organizational, Low, Quick, &[]),
        ],
    );

    pools
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_validates() {
        let catalog = Catalog::builtin().expect("builtin catalog must be valid");
        assert_eq!(catalog.tracks().len(), 4);
        assert_eq!(catalog.drills().len(), 6);
        assert_eq!(catalog.badges().len(), 18);
        assert_eq!(catalog.tasks_for_theme(TaskTheme::General).len(), 14);
        assert_eq!(catalog.tasks_for_theme(TaskTheme::Body).len(), 10);
        assert_eq!(catalog.tasks_for_theme(TaskTheme::Order).len(), 10);
    }

    #[test]
    fn focus_grid_level_formulas() {
        let levels = focus_grid_levels(false);
        assert_eq!(levels.len(), 10);

        let first = &levels[0];
        assert_eq!(first.target, 120);
        assert_eq!(first.time_limit, 14);
        assert_eq!(first.allowed_mistakes, 2);
        assert_eq!(first.sequence_length, 3);
        assert_eq!(first.grid_size, 4);
        assert!((first.difficulty_multiplier - 1.0).abs() < 1e-9);

        let last = &levels[9];
        assert_eq!(last.target, 300);
        assert_eq!(last.time_limit, 8);
        assert_eq!(last.allowed_mistakes, 0);
        assert_eq!(last.sequence_length, 7);
        assert_eq!(last.grid_size, 6);
        assert!((last.difficulty_multiplier - 2.35).abs() < 1e-9);

        // The advanced variant starts bigger but respects the same caps.
        let advanced = focus_grid_levels(true);
        assert_eq!(advanced[0].sequence_length, 4);
        assert_eq!(advanced[0].grid_size, 5);
        assert_eq!(advanced[9].sequence_length, 8);
        assert_eq!(advanced[9].grid_size, 6);
    }

    #[test]
    fn plan_sprint_level_formulas() {
        let levels = plan_sprint_levels(false);
        assert_eq!(levels[0].target, 6);
        assert_eq!(levels[0].time_limit, 43);
        assert_eq!(levels[9].target, 10);
        assert_eq!(levels[9].time_limit, 25);
        assert!(levels.iter().all(|l| l.allowed_mistakes == 0));

        let advanced = plan_sprint_levels(true);
        assert_eq!(advanced[0].target, 8);
        assert_eq!(advanced[9].target, 12);
    }

    #[test]
    fn validation_rejects_unknown_track_reference() {
        let tracks = seed_tracks();
        let mut drills = seed_drills();
        drills[0].track_id = "nowhere".into();

        let err = validate(&tracks, &drills, &seed_badges(), &seed_task_pools()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownTrack { .. }));
    }

    #[test]
    fn validation_rejects_dangling_prerequisite() {
        let mut pools = seed_task_pools();
        pools
            .get_mut(&TaskTheme::Body)
            .unwrap()
            .push(sprint_task(
                "ghost",
                "Ghost task",
                TaskCategory::Physical,
                EnergyLevel::Low,
                TaskDuration::Quick,
                &["does_not_exist"],
            ));

        let err = validate(&seed_tracks(), &seed_drills(), &seed_badges(), &pools).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPrerequisite { .. }));
    }

    #[test]
    fn validation_rejects_unscoped_score_badge() {
        let mut badges = seed_badges();
        badges.push(badge(
            "broken",
            "Broken",
            "Missing drill scope",
            "questionmark",
            BadgeCriteria::new(BadgeCriteriaKind::ScoreInDrill, 10),
            BadgeRarity::Common,
        ));

        let err =
            validate(&seed_tracks(), &seed_drills(), &badges, &seed_task_pools()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingScope { .. }));
    }

    #[test]
    fn validation_rejects_duplicate_ids() {
        let mut drills = seed_drills();
        let dup = drills[0].clone();
        drills.push(dup);

        let err =
            validate(&seed_tracks(), &drills, &seed_badges(), &seed_task_pools()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(_)));
    }

    #[test]
    fn duration_filter_can_come_up_empty() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.drills_with_duration(42).is_empty());
        let two_minute: Vec<_> = catalog
            .drills_with_duration(2)
            .iter()
            .map(|d| d.id.clone())
            .collect();
        assert_eq!(
            two_minute,
            vec!["focus_grid_basic", "plan_sprint_mind", "plan_sprint_body"]
        );
    }
}
