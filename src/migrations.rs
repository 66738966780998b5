//! Versioned schema migrations for the workout database.
//!
//! The schema version lives in SQLite's `user_version` pragma and counts the
//! migrations applied so far. A fresh database replays the whole chain; an
//! old database picks up at its stored version. Each step runs inside its
//! own transaction (rusqlite_migration), so a failing statement rolls the
//! step back and the open fails — there is no partially-migrated state.
//!
//! History of the chain:
//! - v1: the original flat `exercise` table (weight/reps inline, no order)
//! - v2: `order` column for manual drag-and-drop ordering within a date
//! - v3: shadow-table rebuild of `exercise` to the canonical v2 shape
//! - v4: free-text `notes` column
//! - v5: `exercise_set` split — weight/reps/notes move to a child table,
//!   one set per existing exercise, cascade delete on the parent

use log::info;
use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

use crate::error::{Result, StoreError};

/// Schema version the code targets (`user_version` after `to_latest`).
pub const SCHEMA_VERSION: i64 = 5;

/// The full migration chain, oldest first.
pub fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        // v1: original flat exercise table
        M::up(
            r#"
            CREATE TABLE exercise (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                date TEXT NOT NULL,
                name TEXT NOT NULL,
                weight TEXT NOT NULL,
                reps_or_duration TEXT NOT NULL
            );
            "#,
        ),
        // v2: display order within a date
        M::up(r#"ALTER TABLE exercise ADD COLUMN "order" INTEGER NOT NULL DEFAULT 0;"#),
        // v3: rebuild to the canonical shape, copying only the known columns.
        // SQLite can't drop columns of this vintage, hence the shadow table.
        M::up(
            r#"
            CREATE TABLE exercise_new (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                date TEXT NOT NULL,
                name TEXT NOT NULL,
                weight TEXT NOT NULL,
                reps_or_duration TEXT NOT NULL,
                "order" INTEGER NOT NULL DEFAULT 0
            );

            INSERT INTO exercise_new (id, date, name, weight, reps_or_duration, "order")
            SELECT id, date, name, weight, reps_or_duration, "order" FROM exercise;

            DROP TABLE exercise;
            ALTER TABLE exercise_new RENAME TO exercise;
            "#,
        ),
        // v4: free-text notes
        M::up(r#"ALTER TABLE exercise ADD COLUMN notes TEXT NOT NULL DEFAULT '';"#),
        // v5: normalize into exercise + exercise_set. Every existing exercise
        // keeps its inline weight/reps/notes as a single set with order 0.
        M::up(
            r#"
            CREATE TABLE exercise_set (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                exercise_id INTEGER NOT NULL,
                weight TEXT NOT NULL,
                reps_or_duration TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                "order" INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (exercise_id) REFERENCES exercise(id) ON DELETE CASCADE
            );

            CREATE INDEX index_exercise_set_exercise_id ON exercise_set(exercise_id);

            INSERT INTO exercise_set (exercise_id, weight, reps_or_duration, notes, "order")
            SELECT id, weight, reps_or_duration, notes, 0 FROM exercise;

            CREATE TABLE exercise_new (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                date TEXT NOT NULL,
                name TEXT NOT NULL,
                "order" INTEGER NOT NULL DEFAULT 0
            );

            INSERT INTO exercise_new (id, date, name, "order")
            SELECT id, date, name, "order" FROM exercise;

            DROP TABLE exercise;
            ALTER TABLE exercise_new RENAME TO exercise;

            CREATE INDEX index_exercise_date ON exercise(date);
            "#,
        ),
    ])
}

/// Read the stored schema version (`user_version` pragma).
pub fn stored_version(conn: &Connection) -> Result<i64> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

/// Bring `conn` to [`SCHEMA_VERSION`], applying any pending steps in order.
///
/// Refuses to open a database whose stored version is newer than this build:
/// a missing migration is a fatal configuration error, not something to skip
/// over. Foreign key enforcement is switched on after migrating — pragmas
/// don't take effect inside the per-step transactions.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let stored = stored_version(conn)?;
    if stored > SCHEMA_VERSION {
        return Err(StoreError::SchemaAhead {
            found: stored,
            supported: SCHEMA_VERSION,
        });
    }

    if stored < SCHEMA_VERSION {
        info!(
            "workoutlog: [Migrations] Migrating schema v{} -> v{}",
            stored, SCHEMA_VERSION
        );
        migrations().to_latest(conn)?;
        info!("workoutlog: [Migrations] Migration complete");
    }

    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_valid() {
        assert!(migrations().validate().is_ok());
    }

    #[test]
    fn fresh_database_reaches_target_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn already_migrated_database_is_untouched() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        // Second pass must be a no-op, not a replay.
        run_migrations(&mut conn).unwrap();
        assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn newer_database_refuses_to_open() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
        let err = run_migrations(&mut conn).unwrap_err();
        assert!(matches!(err, StoreError::SchemaAhead { found, .. } if found == SCHEMA_VERSION + 1));
    }
}
