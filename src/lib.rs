// src/lib.rs

//! Progression and scoring core for a habit-training app.
//!
//! The crate owns everything behind the screens: the static content catalog,
//! procedural level and round generation, the scoring engine for the two
//! mini-games (Focus Grid and Plan Sprint), the progress ledger (streaks,
//! ritual XP, heatmap, badges) and the daily plan builder. The presentation
//! layer drives it with discrete events and renders whatever comes back;
//! persistence goes through the [`store::ProgressStore`] gateway.
//!
//! Construct a [`Catalog`] and a [`ProgressLedger`] once at the application
//! root and pass them to whatever needs them; the core keeps no global
//! state, takes timestamps at its public boundary, and draws all randomness
//! from a caller-supplied RNG so behavior is reproducible under test.
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use ritual_trainer::models::Difficulty;
//! use ritual_trainer::{Catalog, Completion, FocusGridSession, InMemoryStore, ProgressLedger};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let mut ledger = ProgressLedger::load(InMemoryStore::new(), &catalog);
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! // Play one Focus Grid round by reproducing the generated sequence.
//! let mut session =
//!     FocusGridSession::start(&catalog, "focus_grid_basic", Difficulty::Easy, 2, &mut rng)
//!         .unwrap();
//! let taps = session.round().unwrap().sequence.clone();
//! let report = session.submit(&taps, 5, &mut rng).unwrap();
//! assert!(report.passed);
//!
//! // Finalize the session into the ledger.
//! ledger.record_completion(
//!     &catalog,
//!     Completion {
//!         drill_id: session.drill_id().to_string(),
//!         score: session.total_score(),
//!         duration_minutes: 2,
//!         difficulty: session.difficulty(),
//!         level_reached: session.level_reached(),
//!         was_perfect: session.had_perfect_round(),
//!     },
//! );
//! assert_eq!(ledger.progress().total_drills, 1);
//! ```

pub mod catalog;
pub mod constants;
pub mod models;
pub mod planner;
pub mod progress;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod store;

pub use catalog::{Catalog, CatalogError, TaskTheme};
pub use models::{DailyPlan, PlanReason, PlannedDrill, UserProgress};
pub use planner::build_daily_plan;
pub use progress::{Completion, ProgressLedger};
pub use rules::RuleKind;
pub use session::{
    FocusGridSession, FocusRound, FocusRoundReport, PlanSprintSession, SessionError,
    SessionState, SprintRound, SprintRoundReport,
};
pub use store::{FileStore, InMemoryStore, ProgressStore, StoreError};
