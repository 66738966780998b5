//! Unified error handling for the workout store.
//!
//! Store-level failures propagate as [`StoreError`]; backup/restore failures
//! as [`BackupError`]. The FFI boundary converts both into boolean results
//! and logs them — errors never cross into the UI layer as exceptions.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for workout store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A schema migration step failed. Fatal: the database must not be used.
    #[error("schema migration failed: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    /// The on-disk schema is newer than this build understands. Fatal: the
    /// database refuses to open rather than guess at the data layout.
    #[error("database schema version {found} is newer than supported version {supported}")]
    SchemaAhead { found: i64, supported: i64 },

    /// A workout date was not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid workout date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Rejected deletion that would leave an exercise with zero sets.
    #[error("exercise {exercise_id} must keep at least one set")]
    LastSet { exercise_id: i64 },
}

/// Errors raised by the file-level backup/restore mechanism.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("database file does not exist: {0}")]
    MissingDatabase(PathBuf),

    #[error("database file is empty: {0}")]
    EmptyDatabase(PathBuf),

    #[error("backup I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::SchemaAhead {
            found: 9,
            supported: 5,
        };
        assert!(err.to_string().contains("version 9"));
        assert!(err.to_string().contains("supported version 5"));

        let err = StoreError::LastSet { exercise_id: 3 };
        assert!(err.to_string().contains("exercise 3"));
    }
}
