// src/constants.rs

// --- Defaults ---
pub const DEFAULT_TRACK_ID: &str = "focus";

// --- Ritual XP ---
pub const XP_PER_LEVEL: u32 = 100;
pub const XP_MIN_PER_DRILL: u32 = 5;
pub const XP_SCORE_DIVISOR: f64 = 10.0;
pub const XP_PER_MINUTE: u32 = 2;

// --- Sessions ---
pub const MAX_LEVEL: u32 = 10;

// --- Focus Grid scoring ---
pub const POINTS_PER_TAP: i64 = 15;
pub const COMPLETION_BONUS: i64 = 50;
pub const FOCUS_TIME_BONUS_PER_SECOND: i64 = 3;
pub const MISTAKE_PENALTY: i64 = 10;
pub const FOCUS_LEVEL_BONUS: i64 = 10;

// --- Focus Grid runtime caps ---
pub const GRID_SIZE_CAP: usize = 6;
pub const SEQUENCE_LENGTH_CAP: usize = 7;

// --- Plan Sprint scoring ---
pub const ACCURACY_POINTS_SCALE: f64 = 100.0;
pub const SPRINT_TIME_BONUS_PER_SECOND: i64 = 2;
pub const SPRINT_LEVEL_BONUS: i64 = 15;
pub const PASS_THRESHOLD: f64 = 0.5;
pub const PERFECT_THRESHOLD: f64 = 0.95;

// --- Plan Sprint runtime parameters ---
pub const TASK_COUNT_BASE: usize = 4;
pub const TASK_COUNT_CAP: usize = 8;
pub const SPRINT_MIN_TIME: u32 = 30;
pub const SPRINT_SECONDS_PER_TASK: u32 = 5;
pub const SPRINT_SECONDS_PER_RULE: u32 = 8;
pub const SPRINT_SECONDS_PER_LEVEL: u32 = 2;

// --- Daily plan ---
pub const STREAK_SAVER_MINUTES: u32 = 2;

// --- Weekly stats ---
pub const HEATMAP_WINDOW_DAYS: i64 = 7;
