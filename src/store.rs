//! # Workout Store
//!
//! Single-connection SQLite store for the workout log. One `WorkoutStore`
//! owns the only open connection to the database file; a process-wide
//! singleton hands it to FFI callers. Every committed mutation bumps a
//! monotonic data version and pushes a fresh snapshot to all live
//! subscriptions, so the UI re-renders without polling the tables.
//!
//! The singleton is explicitly closable: backup/restore must be able to
//! release the database file (and its WAL/journal siblings) before copying
//! bytes, then re-create the store against the new file.

use std::sync::Mutex;
use std::sync::mpsc;

use log::warn;
use once_cell::sync::Lazy;
use rusqlite::Connection;

use crate::error::Result;
use crate::exercises::ExerciseWithSets;
use crate::migrations;

/// The store: one connection, the subscriber registry, and a change counter.
#[derive(Debug)]
pub struct WorkoutStore {
    pub(crate) db: Connection,
    db_path: String,
    watchers: Vec<mpsc::Sender<Vec<ExerciseWithSets>>>,
    data_version: u64,
}

impl WorkoutStore {
    /// Open (creating if needed) the database at `db_path` and migrate it to
    /// the current schema version. Fails if the file carries a newer schema
    /// than this build supports, or if any migration step fails.
    pub fn new(db_path: &str) -> Result<Self> {
        let mut db = Connection::open(db_path)?;
        migrations::run_migrations(&mut db)?;

        Ok(Self {
            db,
            db_path: db_path.to_string(),
            watchers: Vec::new(),
            data_version: 0,
        })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }

    /// Path this store was opened with.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Monotonic counter, bumped once per committed mutation. The UI polls
    /// this over FFI and refetches snapshots when it moves.
    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    /// Close the connection, releasing the database file.
    pub fn close(self) -> Result<()> {
        self.db.close().map_err(|(_, e)| e.into())
    }

    /// Subscribe to the full exercise list (date descending, order
    /// ascending). The subscription receives an initial snapshot
    /// immediately, then a new snapshot after every committed mutation,
    /// until the receiver is dropped or the store is closed.
    pub fn observe_all(&mut self) -> Result<ExerciseSubscription> {
        let (sender, receiver) = mpsc::channel();
        let snapshot = self.get_all()?;
        // The receiver can't be gone yet; send is infallible here.
        sender.send(snapshot).ok();
        self.watchers.push(sender);
        Ok(ExerciseSubscription { receiver })
    }

    /// Bump the data version and push a fresh snapshot to every live
    /// subscriber. Cancelled subscriptions (dropped receivers) are pruned.
    pub(crate) fn mark_changed(&mut self) {
        self.data_version += 1;

        if self.watchers.is_empty() {
            return;
        }
        match self.get_all() {
            Ok(snapshot) => {
                self.watchers
                    .retain(|watcher| watcher.send(snapshot.clone()).is_ok());
            }
            Err(e) => {
                warn!("workoutlog: [WorkoutStore] Failed to snapshot for subscribers: {e}");
            }
        }
    }
}

/// Handle for a live query subscription. Dropping it cancels the
/// subscription; the store prunes the dead channel on its next write.
pub struct ExerciseSubscription {
    receiver: mpsc::Receiver<Vec<ExerciseWithSets>>,
}

impl ExerciseSubscription {
    /// Next pending snapshot, if one has been pushed (non-blocking).
    pub fn try_recv(&self) -> Option<Vec<ExerciseWithSets>> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next snapshot (blocking). Returns `None` once the store
    /// has been closed — the sequence has ended and cannot restart.
    pub fn recv(&self) -> Option<Vec<ExerciseWithSets>> {
        self.receiver.recv().ok()
    }
}

// ============================================================================
// Global Store Singleton
// ============================================================================

/// Global workout store instance.
///
/// This singleton allows FFI calls to access a shared store without passing
/// state back and forth across the FFI boundary. Exactly one connection is
/// open at a time; the mutex serializes every writer.
pub static WORKOUT_STORE: Lazy<Mutex<Option<WorkoutStore>>> = Lazy::new(|| Mutex::new(None));

/// Get a lock on the global workout store.
pub fn with_workout_store<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut WorkoutStore) -> R,
{
    let mut guard = WORKOUT_STORE.lock().ok()?;
    guard.as_mut().map(f)
}

/// Close the global store, releasing the database file. Backup/restore call
/// this before touching the file; `workout_store_init` re-creates the store
/// afterwards. Returns false only if closing the connection failed.
pub fn close_workout_store() -> bool {
    let Ok(mut guard) = WORKOUT_STORE.lock() else {
        return false;
    };
    match guard.take() {
        Some(store) => match store.close() {
            Ok(()) => true,
            Err(e) => {
                log::error!("workoutlog: [WorkoutStore] Failed to close store: {e}");
                false
            }
        },
        None => true,
    }
}

// ============================================================================
// FFI Exports for Store Lifecycle
// ============================================================================

pub mod workout_store_ffi {
    use super::*;
    use log::{error, info};

    /// Initialize the workout store with a database path, running any
    /// pending schema migrations. Call once at app startup, and again after
    /// a restore. Returns false (and logs) on failure — including the fatal
    /// cases: a failed migration step or a schema from a newer app version.
    #[uniffi::export]
    pub fn workout_store_init(db_path: String) -> bool {
        crate::init_logging();
        info!("workoutlog: [WorkoutStore] Initializing with db: {}", db_path);

        match WorkoutStore::new(&db_path) {
            Ok(store) => {
                let mut guard = WORKOUT_STORE.lock().unwrap();
                *guard = Some(store);
                info!("workoutlog: [WorkoutStore] Initialized successfully");
                true
            }
            Err(e) => {
                error!("workoutlog: [WorkoutStore] Failed to initialize: {e}");
                false
            }
        }
    }

    /// Check if the workout store is initialized.
    #[uniffi::export]
    pub fn workout_store_is_initialized() -> bool {
        WORKOUT_STORE
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Close the store, releasing the database file.
    #[uniffi::export]
    pub fn workout_store_close() -> bool {
        close_workout_store()
    }

    /// Current change counter. Bumps once per committed mutation; the UI
    /// polls it and refetches the JSON snapshots when it moves.
    #[uniffi::export]
    pub fn workout_store_data_version() -> u64 {
        with_workout_store(|store| store.data_version()).unwrap_or(0)
    }
}
