//! Workoutlogrs - Rust core for the workout log mobile app
//!
//! This crate provides:
//! - UniFFI bindings for iOS/Android
//! - SQLite persistence layer with versioned schema migrations
//! - Ordered exercise/set storage with push-based change notifications
//! - File-level database backup and restore

pub mod backup;
pub mod error;
pub mod exercises;
pub mod migrations;
pub mod ordering;
pub mod store;

pub use backup::{backup_file_name, create_backup, restore_backup};
pub use error::{BackupError, Result, StoreError};
pub use exercises::{Exercise, ExerciseSet, ExerciseWithSets, SetInput};
pub use store::{ExerciseSubscription, WORKOUT_STORE, WorkoutStore, with_workout_store};

uniffi::setup_scaffolding!();

/// Initialize logging for Android
#[cfg(target_os = "android")]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("workoutlogrs"),
    );
}

#[cfg(not(target_os = "android"))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

/// Milliseconds elapsed since `start`, for FFI timing logs.
pub(crate) fn elapsed_ms(start: std::time::Instant) -> u128 {
    start.elapsed().as_millis()
}
