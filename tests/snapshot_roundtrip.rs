// tests/snapshot_roundtrip.rs
//
// Persistence behavior: a serialized progress snapshot restores to an
// identical logical state, the file store replaces atomically, and reset
// lands on the same fresh defaults every time.

use chrono::{TimeZone, Utc};
use ritual_trainer::models::{Difficulty, UserProgress};
use ritual_trainer::{Catalog, Completion, FileStore, InMemoryStore, ProgressLedger, ProgressStore};

fn catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

fn worked_progress(catalog: &Catalog) -> UserProgress {
    let mut ledger = ProgressLedger::load(InMemoryStore::new(), catalog);
    for day in 0..5 {
        let c = Completion {
            drill_id: if day % 2 == 0 {
                "focus_grid_basic".into()
            } else {
                "plan_sprint_mind".into()
            },
            score: 60 + day * 17,
            duration_minutes: 2 + day,
            difficulty: Difficulty::Medium,
            level_reached: 1 + day,
            was_perfect: day == 3,
        };
        ledger.record_completion_at(
            catalog,
            c,
            Utc.with_ymd_and_hms(2025, 6, 1 + day, 8, 15, 0).unwrap(),
        );
    }
    ledger.mark_tutorial_seen("focus_grid_intro");
    ledger.progress().clone()
}

#[test]
fn serde_round_trip_preserves_every_field() {
    let catalog = catalog();
    let progress = worked_progress(&catalog);

    let json = serde_json::to_string_pretty(&progress).unwrap();
    let restored: UserProgress = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, progress);
    assert_eq!(restored.drill_history.len(), 5);
    assert!(!restored.heatmap.is_empty());
    assert!(!restored.unlocked_badge_ids.is_empty());
}

#[test]
fn snapshot_dates_serialize_textually() {
    let catalog = catalog();
    let progress = worked_progress(&catalog);

    let value: serde_json::Value = serde_json::to_value(&progress).unwrap();

    // Heatmap keys are sortable calendar dates.
    let heatmap = value["heatmap"].as_object().unwrap();
    assert!(heatmap.contains_key("2025-06-01"));
    // History timestamps carry full RFC 3339 instants.
    let completed_at = value["drill_history"][0]["completed_at"].as_str().unwrap();
    assert!(completed_at.starts_with("2025-06-01T08:15:00"));
    assert_eq!(value["last_completed_date"].as_str().unwrap(), "2025-06-05");
}

#[test]
fn file_store_persists_ledger_state_across_loads() {
    let catalog = catalog();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");

    {
        let mut ledger = ProgressLedger::load(FileStore::new(&path), &catalog);
        ledger.record_completion_at(
            &catalog,
            Completion {
                drill_id: "focus_grid_basic".into(),
                score: 95,
                duration_minutes: 3,
                difficulty: Difficulty::Hard,
                level_reached: 4,
                was_perfect: true,
            },
            Utc.with_ymd_and_hms(2025, 6, 2, 19, 0, 0).unwrap(),
        );
        ledger.select_track(&catalog, "mind");
    }

    let reloaded = ProgressLedger::load(FileStore::new(&path), &catalog);
    let progress = reloaded.progress();

    assert_eq!(progress.total_drills, 1);
    assert_eq!(progress.selected_track_id, "mind");
    assert_eq!(progress.drill_best_scores.get("focus_grid_basic"), Some(&95));
    // Badge ids persisted; the badge list is re-stamped as unlocked on load.
    assert!(reloaded
        .unlocked_badges()
        .iter()
        .any(|b| b.id == "first_spark"));
}

#[test]
fn corrupt_save_falls_back_to_fresh_defaults() {
    let catalog = catalog();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    std::fs::write(&path, b"\"not a progress snapshot\"").unwrap();

    let ledger = ProgressLedger::load(FileStore::new(&path), &catalog);
    assert_eq!(*ledger.progress(), UserProgress::default());
    assert!(ledger.unlocked_badges().is_empty());
}

#[test]
fn reset_is_idempotent() {
    let catalog = catalog();
    let mut store = InMemoryStore::new();
    store.save(&worked_progress(&catalog)).unwrap();

    let mut ledger = ProgressLedger::load(store, &catalog);
    assert!(ledger.progress().total_drills > 0);

    ledger.reset_progress(&catalog);
    let first = ledger.progress().clone();
    ledger.reset_progress(&catalog);
    let second = ledger.progress().clone();

    assert_eq!(first, second);
    assert_eq!(first, UserProgress::default());
}
