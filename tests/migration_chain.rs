//! Schema migration integration tests.
//!
//! Forges databases at historical schema versions with a raw connection,
//! then opens them through the store and checks the data survived the chain
//! to the current version.

use std::path::Path;

use rusqlite::{Connection, params};
use tempfile::TempDir;
use workoutlogrs::migrations::{SCHEMA_VERSION, stored_version};
use workoutlogrs::{StoreError, WorkoutStore};

/// Build a v1 database: the original flat exercise table, no order column.
fn forge_v1_database(db_path: &Path, rows: &[(&str, &str, &str, &str)]) {
    let conn = Connection::open(db_path).unwrap();
    conn.execute_batch(
        "CREATE TABLE exercise (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            date TEXT NOT NULL,
            name TEXT NOT NULL,
            weight TEXT NOT NULL,
            reps_or_duration TEXT NOT NULL
        );",
    )
    .unwrap();
    for (date, name, weight, reps) in rows {
        conn.execute(
            "INSERT INTO exercise (date, name, weight, reps_or_duration)
             VALUES (?1, ?2, ?3, ?4)",
            params![date, name, weight, reps],
        )
        .unwrap();
    }
    conn.pragma_update(None, "user_version", 1).unwrap();
}

/// Build a v4 database: order and notes inline, not yet split into sets.
fn forge_v4_database(db_path: &Path, rows: &[(&str, &str, &str, &str, &str, i64)]) {
    let conn = Connection::open(db_path).unwrap();
    conn.execute_batch(
        r#"CREATE TABLE exercise (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            date TEXT NOT NULL,
            name TEXT NOT NULL,
            weight TEXT NOT NULL,
            reps_or_duration TEXT NOT NULL,
            "order" INTEGER NOT NULL DEFAULT 0,
            notes TEXT NOT NULL DEFAULT ''
        );"#,
    )
    .unwrap();
    for (date, name, weight, reps, notes, order) in rows {
        conn.execute(
            r#"INSERT INTO exercise (date, name, weight, reps_or_duration, notes, "order")
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![date, name, weight, reps, notes, order],
        )
        .unwrap();
    }
    conn.pragma_update(None, "user_version", 4).unwrap();
}

// ============================================================================
// Fresh Databases
// ============================================================================

#[test]
fn fresh_database_lands_on_the_target_version() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("workout.db");

    let store = WorkoutStore::new(db_path.to_str().unwrap()).unwrap();
    assert!(store.get_all().unwrap().is_empty());
    drop(store);

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
}

#[test]
fn reopening_a_current_database_applies_nothing() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("workout.db");

    drop(WorkoutStore::new(db_path.to_str().unwrap()).unwrap());
    // Second open must succeed without replaying any step.
    let store = WorkoutStore::new(db_path.to_str().unwrap()).unwrap();
    assert!(store.get_all().unwrap().is_empty());
}

// ============================================================================
// Historical Upgrades
// ============================================================================

#[test]
fn v1_database_migrates_to_v5_without_data_loss() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("workout.db");
    forge_v1_database(
        &db_path,
        &[
            ("2023-06-01", "Bench Press", "60", "8"),
            ("2023-06-01", "Squat", "100", "5"),
            ("2023-06-03", "Plank", "N/A", "60s"),
        ],
    );

    let store = WorkoutStore::new(db_path.to_str().unwrap()).unwrap();
    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 3);

    // Every original row is present with identical date/name, now owning
    // exactly one set carrying the old inline fields at order 0.
    let plank = all
        .iter()
        .find(|e| e.exercise.name == "Plank")
        .expect("Plank row lost in migration");
    assert_eq!(plank.exercise.date, "2023-06-03");
    assert_eq!(plank.sets.len(), 1);
    assert_eq!(plank.sets[0].weight, "N/A");
    assert_eq!(plank.sets[0].reps_or_duration, "60s");
    assert_eq!(plank.sets[0].notes, "");
    assert_eq!(plank.sets[0].order, 0);

    for exercise in &all {
        assert_eq!(exercise.sets.len(), 1);
        assert_eq!(exercise.sets[0].order, 0);
        // v1 had no order column; everything defaults to 0.
        assert_eq!(exercise.exercise.order, 0);
    }
    drop(store);

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
}

#[test]
fn v4_database_keeps_notes_and_order_through_the_split() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("workout.db");
    forge_v4_database(
        &db_path,
        &[
            ("2023-12-01", "Bench Press", "60", "8", "felt heavy", 0),
            ("2023-12-01", "Squat", "100", "5", "", 1),
        ],
    );

    let store = WorkoutStore::new(db_path.to_str().unwrap()).unwrap();
    let day = store.get_exercises_by_date("2023-12-01").unwrap();
    assert_eq!(day.len(), 2);

    assert_eq!(day[0].exercise.name, "Bench Press");
    assert_eq!(day[0].exercise.order, 0);
    assert_eq!(day[0].sets[0].notes, "felt heavy");
    assert_eq!(day[1].exercise.name, "Squat");
    assert_eq!(day[1].exercise.order, 1);
    assert_eq!(day[1].sets[0].notes, "");
}

#[test]
fn migrated_database_enforces_the_cascade() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("workout.db");
    forge_v1_database(&db_path, &[("2023-06-01", "Bench Press", "60", "8")]);

    let mut store = WorkoutStore::new(db_path.to_str().unwrap()).unwrap();
    let all = store.get_all().unwrap();
    let id = all[0].exercise.id;

    store.delete_exercise(id).unwrap();
    assert!(store.get_sets_for_exercise(id).unwrap().is_empty());
}

// ============================================================================
// Failure Semantics
// ============================================================================

#[test]
fn database_from_a_newer_app_refuses_to_open() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("workout.db");

    let conn = Connection::open(&db_path).unwrap();
    conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
        .unwrap();
    drop(conn);

    let err = WorkoutStore::new(db_path.to_str().unwrap()).unwrap_err();
    assert!(
        matches!(err, StoreError::SchemaAhead { found, supported }
            if found == SCHEMA_VERSION + 1 && supported == SCHEMA_VERSION)
    );
}
