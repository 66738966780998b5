//! Exercise and set types and operations.
//!
//! An exercise is one logged movement on a calendar date; it owns one or
//! more sets (weight, reps-or-duration, notes). Both carry a dense
//! zero-based `order` for display sequencing — exercises within their date,
//! sets within their exercise.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

pub mod crud;
pub mod ffi;

// Re-export FFI functions
pub use ffi::*;

/// A logged exercise. `id` 0 means "not yet persisted"; the store assigns
/// the generated id on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    /// Calendar day in ISO-8601 `YYYY-MM-DD`; lexicographic order is
    /// chronological order.
    pub date: String,
    pub name: String,
    /// Display position within the date, zero-based.
    pub order: i64,
}

/// One recorded attempt of an exercise.
///
/// `weight` and `reps_or_duration` are free text ("80", "N/A", "45s") —
/// the app never computes with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub id: i64,
    pub exercise_id: i64,
    pub weight: String,
    pub reps_or_duration: String,
    pub notes: String,
    /// Display position within the exercise, zero-based.
    pub order: i64,
}

/// An exercise together with its sets, order ascending. The snapshot shape
/// every read surface returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseWithSets {
    pub exercise: Exercise,
    pub sets: Vec<ExerciseSet>,
}

/// Set fields as entered in the UI, before ids and orders are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct SetInput {
    pub weight: String,
    pub reps_or_duration: String,
    pub notes: String,
}

/// Reject anything that is not a real `YYYY-MM-DD` calendar date before it
/// reaches the database.
pub(crate) fn validate_date(date: &str) -> Result<()> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| StoreError::InvalidDate(date.to_string()))?;
    Ok(())
}
