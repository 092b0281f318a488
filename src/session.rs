// src/session.rs

//! Game sessions: runtime round generation and outcome evaluation.
//!
//! A session runs one drill from level 1 upward. Each passed round advances
//! to the next level until the drill's level table is exhausted; a failed
//! round ends the session immediately. Round parameters derive from the
//! difficulty tier's tuning table plus the current level, and every random
//! choice goes through the caller-supplied RNG.

use crate::catalog::{Catalog, TaskTheme};
use crate::constants::*;
use crate::models::{Difficulty, Drill, GameType, PlanSprintTask};
use crate::rules::{self, RuleKind};
use crate::scoring;
use log::{debug, info};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown drill `{0}`")]
    UnknownDrill(String),
    #[error("drill `{drill}` is not a {expected} drill")]
    WrongGameType { drill: String, expected: &'static str },
    #[error("drill `{drill}` does not offer {difficulty} difficulty")]
    UnsupportedDifficulty { drill: String, difficulty: Difficulty },
    #[error("drill `{drill}` does not offer a {minutes}-minute option")]
    UnsupportedDuration { drill: String, minutes: u32 },
    #[error("no tasks available for the {0} theme")]
    EmptyTaskPool(&'static str),
    #[error("session has already ended")]
    SessionFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Playing,
    /// Every level was passed; terminal.
    Completed,
    /// A round failed; terminal.
    GameOver,
}

fn check_drill<'c>(
    catalog: &'c Catalog,
    drill_id: &str,
    expected: GameType,
    difficulty: Difficulty,
    minutes: u32,
) -> Result<&'c Drill, SessionError> {
    let drill = catalog
        .drill(drill_id)
        .ok_or_else(|| SessionError::UnknownDrill(drill_id.to_string()))?;

    if drill.game_type != expected {
        return Err(SessionError::WrongGameType {
            drill: drill_id.to_string(),
            expected: expected.as_str(),
        });
    }
    if !drill.supports_difficulty(difficulty) {
        return Err(SessionError::UnsupportedDifficulty {
            drill: drill_id.to_string(),
            difficulty,
        });
    }
    if !drill.supports_duration(minutes) {
        return Err(SessionError::UnsupportedDuration {
            drill: drill_id.to_string(),
            minutes,
        });
    }
    Ok(drill)
}

// --- Focus Grid ---

/// Parameters of one Focus Grid round, handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct FocusRound {
    pub level: u32,
    /// Grid side length; tile indices run over `grid_size * grid_size` cells.
    pub grid_size: usize,
    /// Distinct tile indices to reproduce, in order.
    pub sequence: Vec<usize>,
    pub time_budget: u32,
    pub allowed_mistakes: u32,
    /// Seconds each tile stays lit during the preview.
    pub preview_duration: f64,
}

#[derive(Debug, Clone)]
pub struct FocusRoundReport {
    pub score: u32,
    pub passed: bool,
    pub perfect: bool,
    pub correct_taps: u32,
    pub mistakes: u32,
    pub seconds_remaining: u32,
    pub state: SessionState,
}

#[derive(Debug)]
pub struct FocusGridSession {
    drill_id: String,
    difficulty: Difficulty,
    requested_minutes: u32,
    max_level: u32,
    level: u32,
    total_score: u32,
    perfect_rounds: u32,
    state: SessionState,
    round: Option<FocusRound>,
}

impl FocusGridSession {
    pub fn start(
        catalog: &Catalog,
        drill_id: &str,
        difficulty: Difficulty,
        minutes: u32,
        rng: &mut impl Rng,
    ) -> Result<Self, SessionError> {
        let drill = check_drill(catalog, drill_id, GameType::FocusGrid, difficulty, minutes)?;
        let max_level = drill.max_level();

        let mut session = FocusGridSession {
            drill_id: drill_id.to_string(),
            difficulty,
            requested_minutes: minutes,
            max_level,
            level: 1,
            total_score: 0,
            perfect_rounds: 0,
            state: SessionState::Playing,
            round: None,
        };
        session.round = Some(session.make_round(rng));
        info!(
            "Focus Grid session started: drill={} difficulty={} minutes={}",
            drill_id, difficulty, minutes
        );
        Ok(session)
    }

    fn make_round(&self, rng: &mut impl Rng) -> FocusRound {
        let level_idx = (self.level - 1) as usize;
        let grid_size = (self.difficulty.base_grid_size() + level_idx / 4).min(GRID_SIZE_CAP);
        let sequence_length =
            (self.difficulty.min_sequence_length() + level_idx / 3).min(SEQUENCE_LENGTH_CAP);
        let time_budget = self.difficulty.base_time_limit()
            + (sequence_length as f64 * self.difficulty.extra_time_per_tile()).round() as u32;

        let sequence = index::sample(rng, grid_size * grid_size, sequence_length).into_vec();
        debug!(
            "Focus Grid round: level={} grid={} sequence_len={} budget={}s",
            self.level, grid_size, sequence_length, time_budget
        );

        FocusRound {
            level: self.level,
            grid_size,
            sequence,
            time_budget,
            allowed_mistakes: self.difficulty.allowed_mistakes(),
            preview_duration: self.difficulty.preview_duration(),
        }
    }

    /// Replays the tap sequence the player produced and scores the round.
    ///
    /// Out-of-range tile indices are ignored rather than treated as
    /// mistakes; the presentation layer should never send them. On a pass
    /// the session advances (or completes); on a fail it ends.
    pub fn submit(
        &mut self,
        taps: &[usize],
        elapsed_secs: u32,
        rng: &mut impl Rng,
    ) -> Result<FocusRoundReport, SessionError> {
        let round = match (&self.state, self.round.take()) {
            (SessionState::Playing, Some(round)) => round,
            _ => return Err(SessionError::SessionFinished),
        };

        let tile_count = round.grid_size * round.grid_size;
        let mut correct = 0usize;
        let mut mistakes = 0u32;
        for &tap in taps {
            if correct == round.sequence.len() {
                break;
            }
            if tap >= tile_count {
                debug!("Ignoring out-of-range tap index {}", tap);
                continue;
            }
            if tap == round.sequence[correct] {
                correct += 1;
            } else {
                mistakes += 1;
                if mistakes > round.allowed_mistakes {
                    break;
                }
            }
        }

        let timed_out = elapsed_secs >= round.time_budget;
        let seconds_remaining = round.time_budget.saturating_sub(elapsed_secs);
        let completed =
            correct == round.sequence.len() && mistakes <= round.allowed_mistakes && !timed_out;

        let score = scoring::focus_grid_score(
            correct as u32,
            completed,
            seconds_remaining,
            mistakes,
            self.level,
            self.difficulty.score_multiplier(),
        );
        self.total_score += score;

        let perfect = completed && mistakes == 0;
        if perfect {
            self.perfect_rounds += 1;
        }

        if completed {
            if self.level >= self.max_level {
                self.state = SessionState::Completed;
                info!(
                    "Focus Grid session complete: drill={} total={}",
                    self.drill_id, self.total_score
                );
            } else {
                self.level += 1;
                self.round = Some(self.make_round(rng));
            }
        } else {
            self.state = SessionState::GameOver;
            info!(
                "Focus Grid session over at level {}: drill={} total={}",
                self.level, self.drill_id, self.total_score
            );
        }

        Ok(FocusRoundReport {
            score,
            passed: completed,
            perfect,
            correct_taps: correct as u32,
            mistakes,
            seconds_remaining,
            state: self.state,
        })
    }

    pub fn drill_id(&self) -> &str {
        &self.drill_id
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn requested_minutes(&self) -> u32 {
        self.requested_minutes
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn round(&self) -> Option<&FocusRound> {
        self.round.as_ref()
    }

    /// Highest level reached this session.
    pub fn level_reached(&self) -> u32 {
        self.level
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn perfect_rounds(&self) -> u32 {
        self.perfect_rounds
    }

    pub fn had_perfect_round(&self) -> bool {
        self.perfect_rounds > 0
    }
}

// --- Plan Sprint ---

/// Parameters of one Plan Sprint round. `tasks` is the shuffled hand the
/// player starts from; the committed ordering references these by id.
#[derive(Debug, Clone)]
pub struct SprintRound {
    pub level: u32,
    pub tasks: Vec<PlanSprintTask>,
    pub rules: Vec<RuleKind>,
    pub time_budget: u32,
}

#[derive(Debug, Clone)]
pub struct SprintRoundReport {
    pub score: u32,
    pub passed: bool,
    pub perfect: bool,
    pub average_rule_score: f64,
    pub rule_scores: Vec<(RuleKind, f64)>,
    pub seconds_remaining: u32,
    pub state: SessionState,
}

#[derive(Debug)]
pub struct PlanSprintSession {
    drill_id: String,
    difficulty: Difficulty,
    requested_minutes: u32,
    theme: TaskTheme,
    pool: Vec<PlanSprintTask>,
    max_level: u32,
    level: u32,
    total_score: u32,
    perfect_rounds: u32,
    state: SessionState,
    round: Option<SprintRound>,
}

impl PlanSprintSession {
    pub fn start(
        catalog: &Catalog,
        drill_id: &str,
        difficulty: Difficulty,
        minutes: u32,
        rng: &mut impl Rng,
    ) -> Result<Self, SessionError> {
        let drill = check_drill(catalog, drill_id, GameType::PlanSprint, difficulty, minutes)?;

        let theme = TaskTheme::for_track(&drill.track_id);
        let pool = catalog.tasks_for_theme(theme).to_vec();
        if pool.is_empty() {
            return Err(SessionError::EmptyTaskPool(theme.as_str()));
        }

        let mut session = PlanSprintSession {
            drill_id: drill_id.to_string(),
            difficulty,
            requested_minutes: minutes,
            theme,
            pool,
            max_level: drill.max_level(),
            level: 1,
            total_score: 0,
            perfect_rounds: 0,
            state: SessionState::Playing,
            round: None,
        };
        session.round = Some(session.make_round(rng));
        info!(
            "Plan Sprint session started: drill={} theme={} difficulty={} minutes={}",
            drill_id,
            theme.as_str(),
            difficulty,
            minutes
        );
        Ok(session)
    }

    fn make_round(&self, rng: &mut impl Rng) -> SprintRound {
        let rules = rules::rules_for_level(self.level);
        let task_count = self
            .pool
            .len()
            .min(TASK_COUNT_CAP.min(TASK_COUNT_BASE + self.level as usize / 2));
        let tasks: Vec<PlanSprintTask> = self
            .pool
            .choose_multiple(rng, task_count)
            .cloned()
            .collect();

        let time_budget = (i64::from(self.difficulty.sprint_base_time())
            + task_count as i64 * i64::from(SPRINT_SECONDS_PER_TASK)
            + rules.len() as i64 * i64::from(SPRINT_SECONDS_PER_RULE)
            - i64::from(self.level) * i64::from(SPRINT_SECONDS_PER_LEVEL))
        .max(i64::from(SPRINT_MIN_TIME)) as u32;

        debug!(
            "Plan Sprint round: level={} tasks={} rules={} budget={}s",
            self.level,
            task_count,
            rules.len(),
            time_budget
        );

        SprintRound {
            level: self.level,
            tasks,
            rules,
            time_budget,
        }
    }

    /// Evaluates the committed ordering against the active rules.
    ///
    /// Ids outside the round's task set are dropped and duplicates keep
    /// their first position, so a malformed submission cannot corrupt the
    /// evaluation. Scoring happens whether or not the clock ran out; a late
    /// commit simply gets no time bonus.
    pub fn submit(
        &mut self,
        ordering: &[String],
        elapsed_secs: u32,
        rng: &mut impl Rng,
    ) -> Result<SprintRoundReport, SessionError> {
        let round = match (&self.state, self.round.take()) {
            (SessionState::Playing, Some(round)) => round,
            _ => return Err(SessionError::SessionFinished),
        };

        let mut seen = std::collections::HashSet::new();
        let committed: Vec<PlanSprintTask> = ordering
            .iter()
            .filter_map(|id| {
                if !seen.insert(id.as_str()) {
                    return None;
                }
                let task = round.tasks.iter().find(|t| &t.id == id);
                if task.is_none() {
                    debug!("Ignoring unknown task id `{}` in committed ordering", id);
                }
                task.cloned()
            })
            .collect();

        let rule_scores: Vec<(RuleKind, f64)> = round
            .rules
            .iter()
            .map(|rule| (*rule, rule.evaluate(&committed)))
            .collect();
        let average =
            rules::average_score(&rule_scores.iter().map(|(_, s)| *s).collect::<Vec<_>>());

        let seconds_remaining = round.time_budget.saturating_sub(elapsed_secs);
        let score = scoring::plan_sprint_score(
            average,
            seconds_remaining,
            self.level,
            self.difficulty.score_multiplier(),
        );
        self.total_score += score;

        let passed = scoring::sprint_passes(average);
        let perfect = scoring::sprint_is_perfect(average);
        if perfect {
            self.perfect_rounds += 1;
        }

        if passed {
            if self.level >= self.max_level {
                self.state = SessionState::Completed;
                info!(
                    "Plan Sprint session complete: drill={} total={}",
                    self.drill_id, self.total_score
                );
            } else {
                self.level += 1;
                self.round = Some(self.make_round(rng));
            }
        } else {
            self.state = SessionState::GameOver;
            info!(
                "Plan Sprint session over at level {}: drill={} avg={:.2} total={}",
                self.level, self.drill_id, average, self.total_score
            );
        }

        Ok(SprintRoundReport {
            score,
            passed,
            perfect,
            average_rule_score: average,
            rule_scores,
            seconds_remaining,
            state: self.state,
        })
    }

    pub fn drill_id(&self) -> &str {
        &self.drill_id
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn requested_minutes(&self) -> u32 {
        self.requested_minutes
    }

    pub fn theme(&self) -> TaskTheme {
        self.theme
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn round(&self) -> Option<&SprintRound> {
        self.round.as_ref()
    }

    pub fn level_reached(&self) -> u32 {
        self.level
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn perfect_rounds(&self) -> u32 {
        self.perfect_rounds
    }

    pub fn had_perfect_round(&self) -> bool {
        self.perfect_rounds > 0
    }
}
