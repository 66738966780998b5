//! File-level backup and restore of the workout database.
//!
//! Both operations work on raw bytes, bypassing the store: every open
//! connection must be closed first so the storage engine has flushed and
//! released the file and its WAL/journal siblings. The FFI glue closes the
//! global store before touching the file; after a restore the app restarts
//! its process and calls `workout_store_init` against the replaced file —
//! reopening in place is not enough, cached snapshots and subscriptions
//! would still reference the old connection.
//!
//! There is no temp-file-then-rename swap: a failed copy leaves whatever
//! partial state it produced, and the failure is reported to the caller.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::info;

use crate::error::BackupError;

/// Suffixes of the side files the storage engine keeps next to the main
/// database file (rollback journal, shared memory, write-ahead log).
const SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-shm", "-wal"];

/// Suggested backup filename, timestamped for human identification.
pub fn backup_file_name(now: DateTime<Local>) -> String {
    format!("workout_backup_{}.db", now.format("%Y%m%d_%H%M%S"))
}

/// Copy the live database file to `dest`. Returns the bytes copied.
///
/// The source must exist and be non-empty — a zero-length file means the
/// database was never created or is mid-write, and backing it up would
/// produce a useless copy.
pub fn create_backup(db_path: &Path, dest: &Path) -> Result<u64, BackupError> {
    if !db_path.exists() {
        return Err(BackupError::MissingDatabase(db_path.to_path_buf()));
    }
    if fs::metadata(db_path)?.len() == 0 {
        return Err(BackupError::EmptyDatabase(db_path.to_path_buf()));
    }

    let mut input = File::open(db_path)?;
    let mut output = File::create(dest)?;
    let bytes = io::copy(&mut input, &mut output)?;

    info!(
        "workoutlog: [Backup] Backed up {} bytes from {}",
        bytes,
        db_path.display()
    );
    Ok(bytes)
}

/// Overwrite the live database with `source`'s bytes. Returns bytes copied.
///
/// The live file and its sidecar files are deleted first — a stale WAL or
/// journal next to a freshly restored database would corrupt it on the next
/// open. Owner read/write permissions are restored on the new file.
pub fn restore_backup(db_path: &Path, source: &Path) -> Result<u64, BackupError> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    remove_database_files(db_path)?;

    let mut input = File::open(source)?;
    let mut output = File::create(db_path)?;
    let bytes = io::copy(&mut input, &mut output)?;

    restore_permissions(db_path)?;

    info!(
        "workoutlog: [Backup] Restored {} bytes to {}",
        bytes,
        db_path.display()
    );
    Ok(bytes)
}

/// Sidecar paths for a database file (`foo.db-journal`, `-shm`, `-wal`).
fn sidecar_paths(db_path: &Path) -> Vec<PathBuf> {
    SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut path = db_path.as_os_str().to_os_string();
            path.push(suffix);
            PathBuf::from(path)
        })
        .collect()
}

/// Delete the main database file and every sidecar; missing files are fine.
fn remove_database_files(db_path: &Path) -> io::Result<()> {
    for path in std::iter::once(db_path.to_path_buf()).chain(sidecar_paths(db_path)) {
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(unix)]
fn restore_permissions(db_path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(db_path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restore_permissions(_db_path: &Path) -> io::Result<()> {
    Ok(())
}

// ============================================================================
// FFI Exports for Backup/Restore
// ============================================================================

pub mod backup_ffi {
    use super::*;
    use crate::store::close_workout_store;
    use log::error;

    /// Back up the database to `dest_path`. Closes the global store first;
    /// call `workout_store_init` again afterwards. Returns false on any
    /// failure (logged), leaving the caller to notify the user.
    #[uniffi::export]
    pub fn workout_backup_create(db_path: String, dest_path: String) -> bool {
        crate::init_logging();
        if !close_workout_store() {
            return false;
        }

        match create_backup(Path::new(&db_path), Path::new(&dest_path)) {
            Ok(_) => true,
            Err(e) => {
                error!("workoutlog: [Backup] Backup failed: {e}");
                false
            }
        }
    }

    /// Restore the database from `source_path`. Closes the global store and
    /// replaces the live file; the app must restart its process and
    /// re-initialize. Returns false on any failure (logged).
    #[uniffi::export]
    pub fn workout_backup_restore(db_path: String, source_path: String) -> bool {
        crate::init_logging();
        if !close_workout_store() {
            return false;
        }

        match restore_backup(Path::new(&db_path), Path::new(&source_path)) {
            Ok(_) => true,
            Err(e) => {
                error!("workoutlog: [Backup] Restore failed: {e}");
                false
            }
        }
    }

    /// Timestamped filename for a new backup, e.g.
    /// `workout_backup_20240131_142500.db`.
    #[uniffi::export]
    pub fn workout_backup_file_name() -> String {
        backup_file_name(Local::now())
    }
}
