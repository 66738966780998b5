//! FFI bindings for exercise and set operations.
//!
//! Everything the presentation layer may call goes through here. Errors are
//! logged and converted to boolean / empty results — they never cross the
//! boundary as exceptions. List-shaped results cross as JSON strings
//! (camelCase field names) to keep the binding surface small.

use std::time::Instant;

use log::{error, info};

use super::{Exercise, ExerciseSet, SetInput};
use crate::elapsed_ms;
use crate::store::with_workout_store;

// ============================================================================
// Snapshot Getters
// ============================================================================

/// All exercises with their sets as JSON, newest date first. Empty array on
/// error or when the store is not initialized.
#[uniffi::export]
pub fn workout_store_get_all_json() -> String {
    let start = Instant::now();
    let json = with_workout_store(|store| match store.get_all() {
        Ok(all) => {
            info!(
                "workoutlog: [WorkoutStore] get_all: {} exercises ({} ms)",
                all.len(),
                elapsed_ms(start)
            );
            serde_json::to_string(&all).unwrap_or_else(|_| "[]".to_string())
        }
        Err(e) => {
            error!("workoutlog: [WorkoutStore] get_all failed: {e}");
            "[]".to_string()
        }
    });
    json.unwrap_or_else(|| "[]".to_string())
}

/// One date's exercises with sets as JSON, display order ascending.
#[uniffi::export]
pub fn workout_store_get_exercises_by_date_json(date: String) -> String {
    with_workout_store(|store| match store.get_exercises_by_date(&date) {
        Ok(exercises) => serde_json::to_string(&exercises).unwrap_or_else(|_| "[]".to_string()),
        Err(e) => {
            error!("workoutlog: [WorkoutStore] get_exercises_by_date failed: {e}");
            "[]".to_string()
        }
    })
    .unwrap_or_else(|| "[]".to_string())
}

/// Single exercise with sets as JSON, `null` when the id does not exist.
#[uniffi::export]
pub fn workout_store_get_exercise_by_id_json(id: i64) -> String {
    with_workout_store(|store| match store.get_exercise_by_id(id) {
        Ok(Some(exercise)) => {
            serde_json::to_string(&exercise).unwrap_or_else(|_| "null".to_string())
        }
        Ok(None) => "null".to_string(),
        Err(e) => {
            error!("workoutlog: [WorkoutStore] get_exercise_by_id failed: {e}");
            "null".to_string()
        }
    })
    .unwrap_or_else(|| "null".to_string())
}

// ============================================================================
// Exercise Mutations
// ============================================================================

/// Create an exercise at the end of its date with its first set (and any
/// additional sets). Returns the generated exercise id, 0 on failure.
#[uniffi::export]
pub fn workout_store_add_exercise(
    date: String,
    name: String,
    first_set: SetInput,
    additional_sets: Vec<SetInput>,
) -> i64 {
    with_workout_store(
        |store| match store.add_exercise(&date, &name, &first_set, &additional_sets) {
            Ok(id) => id,
            Err(e) => {
                error!("workoutlog: [WorkoutStore] add_exercise failed: {e}");
                0
            }
        },
    )
    .unwrap_or(0)
}

/// Upsert an exercise row (id 0 generates). Returns the row id, 0 on failure.
#[uniffi::export]
pub fn workout_store_insert_exercise(exercise: Exercise) -> i64 {
    with_workout_store(|store| match store.insert_exercise(&exercise) {
        Ok(id) => id,
        Err(e) => {
            error!("workoutlog: [WorkoutStore] insert_exercise failed: {e}");
            0
        }
    })
    .unwrap_or(0)
}

/// Full-row replace by id; a missing id is a no-op that still returns true.
#[uniffi::export]
pub fn workout_store_update_exercise(exercise: Exercise) -> bool {
    with_workout_store(|store| match store.update_exercise(&exercise) {
        Ok(()) => true,
        Err(e) => {
            error!("workoutlog: [WorkoutStore] update_exercise failed: {e}");
            false
        }
    })
    .unwrap_or(false)
}

/// Batch full-row replace, one transaction.
#[uniffi::export]
pub fn workout_store_update_exercises(exercises: Vec<Exercise>) -> bool {
    with_workout_store(|store| match store.update_exercises(&exercises) {
        Ok(()) => true,
        Err(e) => {
            error!("workoutlog: [WorkoutStore] update_exercises failed: {e}");
            false
        }
    })
    .unwrap_or(false)
}

/// Rename an exercise and replace its set list from UI input.
#[uniffi::export]
pub fn workout_store_update_exercise_with_sets(
    exercise_id: i64,
    name: String,
    sets: Vec<SetInput>,
) -> bool {
    with_workout_store(|store| {
        match store.update_exercise_with_sets(exercise_id, &name, &sets) {
            Ok(()) => true,
            Err(e) => {
                error!("workoutlog: [WorkoutStore] update_exercise_with_sets failed: {e}");
                false
            }
        }
    })
    .unwrap_or(false)
}

/// Rewrite one date's display order to the given id sequence.
#[uniffi::export]
pub fn workout_store_reorder_exercises(date: String, ids_in_visual_order: Vec<i64>) -> bool {
    with_workout_store(
        |store| match store.reorder_exercises(&date, &ids_in_visual_order) {
            Ok(()) => true,
            Err(e) => {
                error!("workoutlog: [WorkoutStore] reorder_exercises failed: {e}");
                false
            }
        },
    )
    .unwrap_or(false)
}

/// Move a whole day's exercises to another date.
#[uniffi::export]
pub fn workout_store_update_workout_date(old_date: String, new_date: String) -> bool {
    with_workout_store(
        |store| match store.update_workout_date(&old_date, &new_date) {
            Ok(()) => true,
            Err(e) => {
                error!("workoutlog: [WorkoutStore] update_workout_date failed: {e}");
                false
            }
        },
    )
    .unwrap_or(false)
}

/// Delete one exercise (its sets cascade).
#[uniffi::export]
pub fn workout_store_delete_exercise(id: i64) -> bool {
    with_workout_store(|store| match store.delete_exercise(id) {
        Ok(()) => true,
        Err(e) => {
            error!("workoutlog: [WorkoutStore] delete_exercise failed: {e}");
            false
        }
    })
    .unwrap_or(false)
}

/// Delete a whole day's workout.
#[uniffi::export]
pub fn workout_store_delete_workout(date: String) -> bool {
    with_workout_store(|store| match store.delete_exercises_by_date(&date) {
        Ok(()) => true,
        Err(e) => {
            error!("workoutlog: [WorkoutStore] delete_workout failed: {e}");
            false
        }
    })
    .unwrap_or(false)
}

// ============================================================================
// Set Mutations
// ============================================================================

/// Bulk upsert of sets.
#[uniffi::export]
pub fn workout_store_insert_sets(sets: Vec<ExerciseSet>) -> bool {
    with_workout_store(|store| match store.insert_sets(&sets) {
        Ok(()) => true,
        Err(e) => {
            error!("workoutlog: [WorkoutStore] insert_sets failed: {e}");
            false
        }
    })
    .unwrap_or(false)
}

/// Transactional replace-all of an exercise's sets.
#[uniffi::export]
pub fn workout_store_update_sets_for_exercise(exercise_id: i64, sets: Vec<ExerciseSet>) -> bool {
    with_workout_store(
        |store| match store.update_sets_for_exercise(exercise_id, &sets) {
            Ok(()) => true,
            Err(e) => {
                error!("workoutlog: [WorkoutStore] update_sets_for_exercise failed: {e}");
                false
            }
        },
    )
    .unwrap_or(false)
}

/// Delete one set. Returns false both on error and when the deletion was
/// rejected because it would leave the exercise with zero sets.
#[uniffi::export]
pub fn workout_store_delete_set(exercise_id: i64, set_id: i64) -> bool {
    with_workout_store(|store| match store.delete_set(exercise_id, set_id) {
        Ok(()) => true,
        Err(e) => {
            error!("workoutlog: [WorkoutStore] delete_set rejected: {e}");
            false
        }
    })
    .unwrap_or(false)
}
