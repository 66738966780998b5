//! Exercise and set CRUD operations.
//!
//! The only sanctioned read/write surface over the `exercise` and
//! `exercise_set` tables. Inserts are upserts by id (replace-on-conflict);
//! updates are full-row replaces that silently no-op on a missing id;
//! multi-statement operations run in a single transaction and emit a single
//! change notification after commit.

use rusqlite::{OptionalExtension, Row, Transaction, params};

use super::{Exercise, ExerciseSet, ExerciseWithSets, SetInput, validate_date};
use crate::error::{Result, StoreError};
use crate::ordering;
use crate::store::WorkoutStore;

fn exercise_from_row(row: &Row) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: row.get(0)?,
        date: row.get(1)?,
        name: row.get(2)?,
        order: row.get(3)?,
    })
}

fn set_from_row(row: &Row) -> rusqlite::Result<ExerciseSet> {
    Ok(ExerciseSet {
        id: row.get(0)?,
        exercise_id: row.get(1)?,
        weight: row.get(2)?,
        reps_or_duration: row.get(3)?,
        notes: row.get(4)?,
        order: row.get(5)?,
    })
}

impl WorkoutStore {
    // ========================================================================
    // Snapshot Queries
    // ========================================================================

    /// All exercises with their sets, newest date first. This is the
    /// snapshot shape `observe_all` re-emits after every mutation.
    pub fn get_all(&self) -> Result<Vec<ExerciseWithSets>> {
        let mut stmt = self.db.prepare(
            r#"SELECT id, date, name, "order" FROM exercise
               ORDER BY date DESC, "order" ASC, id ASC"#,
        )?;
        let exercises = stmt
            .query_map([], exercise_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        exercises
            .into_iter()
            .map(|exercise| {
                let sets = self.get_sets_for_exercise(exercise.id)?;
                Ok(ExerciseWithSets { exercise, sets })
            })
            .collect()
    }

    /// Exercises for one date, display order ascending.
    pub fn get_exercises_by_date(&self, date: &str) -> Result<Vec<ExerciseWithSets>> {
        let mut stmt = self.db.prepare(
            r#"SELECT id, date, name, "order" FROM exercise
               WHERE date = ?1 ORDER BY "order" ASC, id ASC"#,
        )?;
        let exercises = stmt
            .query_map([date], exercise_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        exercises
            .into_iter()
            .map(|exercise| {
                let sets = self.get_sets_for_exercise(exercise.id)?;
                Ok(ExerciseWithSets { exercise, sets })
            })
            .collect()
    }

    /// Single exercise with its sets, `None` when the id does not exist.
    pub fn get_exercise_by_id(&self, id: i64) -> Result<Option<ExerciseWithSets>> {
        let exercise = self
            .db
            .query_row(
                r#"SELECT id, date, name, "order" FROM exercise WHERE id = ?1"#,
                [id],
                exercise_from_row,
            )
            .optional()?;

        match exercise {
            Some(exercise) => {
                let sets = self.get_sets_for_exercise(exercise.id)?;
                Ok(Some(ExerciseWithSets { exercise, sets }))
            }
            None => Ok(None),
        }
    }

    /// Sets of one exercise, display order ascending (id breaks ties).
    pub fn get_sets_for_exercise(&self, exercise_id: i64) -> Result<Vec<ExerciseSet>> {
        let mut stmt = self.db.prepare(
            r#"SELECT id, exercise_id, weight, reps_or_duration, notes, "order"
               FROM exercise_set WHERE exercise_id = ?1
               ORDER BY "order" ASC, id ASC"#,
        )?;
        let sets = stmt
            .query_map([exercise_id], set_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sets)
    }

    // ========================================================================
    // Exercise Mutations
    // ========================================================================

    /// Upsert an exercise row. Id 0 gets a generated id; a known id replaces
    /// the row entirely (which, with cascade enabled, also drops its sets —
    /// use `update_exercise` to edit a row in place).
    pub fn insert_exercise(&mut self, exercise: &Exercise) -> Result<i64> {
        validate_date(&exercise.date)?;

        let id = if exercise.id == 0 {
            self.db.execute(
                r#"INSERT INTO exercise (date, name, "order") VALUES (?1, ?2, ?3)"#,
                params![exercise.date, exercise.name, exercise.order],
            )?;
            self.db.last_insert_rowid()
        } else {
            self.db.execute(
                r#"INSERT OR REPLACE INTO exercise (id, date, name, "order")
                   VALUES (?1, ?2, ?3, ?4)"#,
                params![exercise.id, exercise.date, exercise.name, exercise.order],
            )?;
            exercise.id
        };

        self.mark_changed();
        Ok(id)
    }

    /// The composed creation flow: append the exercise at the end of its
    /// date and insert its first set (order 0) plus any additional sets
    /// (order 1..), all in one transaction.
    pub fn add_exercise(
        &mut self,
        date: &str,
        name: &str,
        first_set: &SetInput,
        additional_sets: &[SetInput],
    ) -> Result<i64> {
        validate_date(date)?;

        let existing_orders = self.sibling_orders(date)?;
        let order = ordering::append_order(&existing_orders);

        let tx = self.db.transaction()?;
        tx.execute(
            r#"INSERT INTO exercise (date, name, "order") VALUES (?1, ?2, ?3)"#,
            params![date, name, order],
        )?;
        let exercise_id = tx.last_insert_rowid();

        for (index, set) in std::iter::once(first_set)
            .chain(additional_sets.iter())
            .enumerate()
        {
            tx.execute(
                r#"INSERT INTO exercise_set (exercise_id, weight, reps_or_duration, notes, "order")
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![
                    exercise_id,
                    set.weight,
                    set.reps_or_duration,
                    set.notes,
                    index as i64
                ],
            )?;
        }
        tx.commit()?;

        self.mark_changed();
        Ok(exercise_id)
    }

    /// Full-row replace by id. A missing id is a silent no-op.
    pub fn update_exercise(&mut self, exercise: &Exercise) -> Result<()> {
        validate_date(&exercise.date)?;
        self.db.execute(
            r#"UPDATE exercise SET date = ?2, name = ?3, "order" = ?4 WHERE id = ?1"#,
            params![exercise.id, exercise.date, exercise.name, exercise.order],
        )?;
        self.mark_changed();
        Ok(())
    }

    /// Batch variant of `update_exercise`; one transaction, one notification.
    pub fn update_exercises(&mut self, batch: &[Exercise]) -> Result<()> {
        for exercise in batch {
            validate_date(&exercise.date)?;
        }
        let tx = self.db.transaction()?;
        for exercise in batch {
            tx.execute(
                r#"UPDATE exercise SET date = ?2, name = ?3, "order" = ?4 WHERE id = ?1"#,
                params![exercise.id, exercise.date, exercise.name, exercise.order],
            )?;
        }
        tx.commit()?;
        self.mark_changed();
        Ok(())
    }

    /// Move every exercise of a day to another date. Orders travel with the
    /// rows unchanged.
    pub fn update_workout_date(&mut self, old_date: &str, new_date: &str) -> Result<()> {
        validate_date(new_date)?;
        self.db.execute(
            "UPDATE exercise SET date = ?2 WHERE date = ?1",
            params![old_date, new_date],
        )?;
        self.mark_changed();
        Ok(())
    }

    /// Rewrite one date's sibling orders to match the requested visual
    /// sequence: position in `ids_in_visual_order` becomes the new order.
    /// O(n) full rewrite per gesture, never an incremental shift.
    pub fn reorder_exercises(&mut self, date: &str, ids_in_visual_order: &[i64]) -> Result<()> {
        let assignments = ordering::orders_for_sequence(ids_in_visual_order);

        let tx = self.db.transaction()?;
        for (id, order) in assignments {
            // Date is part of the predicate so a stale id from another day
            // can't be dragged into this one.
            tx.execute(
                r#"UPDATE exercise SET "order" = ?2 WHERE id = ?1 AND date = ?3"#,
                params![id, order, date],
            )?;
        }
        tx.commit()?;

        self.mark_changed();
        Ok(())
    }

    /// Delete one exercise; the cascade removes its sets. Sibling orders
    /// are left untouched — within a date a gap is tolerated until the UI
    /// re-sends a full reorder.
    pub fn delete_exercise(&mut self, id: i64) -> Result<()> {
        self.db.execute("DELETE FROM exercise WHERE id = ?1", [id])?;
        self.mark_changed();
        Ok(())
    }

    /// Delete a whole day's exercises (and, via cascade, their sets).
    pub fn delete_exercises_by_date(&mut self, date: &str) -> Result<()> {
        self.db
            .execute("DELETE FROM exercise WHERE date = ?1", [date])?;
        self.mark_changed();
        Ok(())
    }

    // ========================================================================
    // Set Mutations
    // ========================================================================

    /// Bulk upsert of sets, replace-on-conflict by id.
    pub fn insert_sets(&mut self, sets: &[ExerciseSet]) -> Result<()> {
        let tx = self.db.transaction()?;
        for set in sets {
            Self::upsert_set_tx(&tx, set)?;
        }
        tx.commit()?;
        self.mark_changed();
        Ok(())
    }

    /// Batch full-row replace of sets by id; missing ids no-op silently.
    pub fn update_sets(&mut self, batch: &[ExerciseSet]) -> Result<()> {
        let tx = self.db.transaction()?;
        for set in batch {
            tx.execute(
                r#"UPDATE exercise_set
                   SET exercise_id = ?2, weight = ?3, reps_or_duration = ?4,
                       notes = ?5, "order" = ?6
                   WHERE id = ?1"#,
                params![
                    set.id,
                    set.exercise_id,
                    set.weight,
                    set.reps_or_duration,
                    set.notes,
                    set.order
                ],
            )?;
        }
        tx.commit()?;
        self.mark_changed();
        Ok(())
    }

    /// Transactional replace-all: drop every set of the exercise, then bulk
    /// insert `new_sets`. The caller supplies dense orders and keeps the ids
    /// it wants to survive (so UI state keyed by set id stays attached).
    pub fn update_sets_for_exercise(
        &mut self,
        exercise_id: i64,
        new_sets: &[ExerciseSet],
    ) -> Result<()> {
        let tx = self.db.transaction()?;
        tx.execute(
            "DELETE FROM exercise_set WHERE exercise_id = ?1",
            [exercise_id],
        )?;
        for set in new_sets {
            Self::upsert_set_tx(&tx, set)?;
        }
        tx.commit()?;
        self.mark_changed();
        Ok(())
    }

    /// Edit flow for the add/edit screen: rename the exercise and replace
    /// its set list from UI input. Surviving positions reuse the existing
    /// set ids; extra positions get generated ids. A missing exercise id is
    /// a silent no-op, like any other update.
    pub fn update_exercise_with_sets(
        &mut self,
        exercise_id: i64,
        name: &str,
        sets: &[SetInput],
    ) -> Result<()> {
        let Some(current) = self.get_exercise_by_id(exercise_id)? else {
            return Ok(());
        };

        let new_sets: Vec<ExerciseSet> = sets
            .iter()
            .enumerate()
            .map(|(index, input)| ExerciseSet {
                id: current.sets.get(index).map_or(0, |existing| existing.id),
                exercise_id,
                weight: input.weight.clone(),
                reps_or_duration: input.reps_or_duration.clone(),
                notes: input.notes.clone(),
                order: index as i64,
            })
            .collect();

        let tx = self.db.transaction()?;
        tx.execute(
            "UPDATE exercise SET name = ?2 WHERE id = ?1",
            params![exercise_id, name],
        )?;
        tx.execute(
            "DELETE FROM exercise_set WHERE exercise_id = ?1",
            [exercise_id],
        )?;
        for set in &new_sets {
            Self::upsert_set_tx(&tx, set)?;
        }
        tx.commit()?;

        self.mark_changed();
        Ok(())
    }

    /// Delete one set, keeping the exercise's invariant that at least one
    /// set remains. Rejected with `StoreError::LastSet` when `set_id` is the
    /// only set; on success the survivors are resequenced dense 0..k-1 in
    /// their current relative order.
    pub fn delete_set(&mut self, exercise_id: i64, set_id: i64) -> Result<()> {
        let sets = self.get_sets_for_exercise(exercise_id)?;
        if sets.len() <= 1 {
            return Err(StoreError::LastSet { exercise_id });
        }

        let mut survivors: Vec<(i64, i64)> = sets
            .iter()
            .filter(|set| set.id != set_id)
            .map(|set| (set.id, set.order))
            .collect();
        ordering::resequence(&mut survivors);

        let tx = self.db.transaction()?;
        tx.execute("DELETE FROM exercise_set WHERE id = ?1", [set_id])?;
        for (id, order) in survivors {
            tx.execute(
                r#"UPDATE exercise_set SET "order" = ?2 WHERE id = ?1"#,
                params![id, order],
            )?;
        }
        tx.commit()?;

        self.mark_changed();
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn sibling_orders(&self, date: &str) -> Result<Vec<i64>> {
        let mut stmt = self
            .db
            .prepare(r#"SELECT "order" FROM exercise WHERE date = ?1"#)?;
        let orders = stmt
            .query_map([date], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(orders)
    }

    fn upsert_set_tx(tx: &Transaction, set: &ExerciseSet) -> Result<i64> {
        if set.id == 0 {
            tx.execute(
                r#"INSERT INTO exercise_set (exercise_id, weight, reps_or_duration, notes, "order")
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![
                    set.exercise_id,
                    set.weight,
                    set.reps_or_duration,
                    set.notes,
                    set.order
                ],
            )?;
            Ok(tx.last_insert_rowid())
        } else {
            tx.execute(
                r#"INSERT OR REPLACE INTO exercise_set
                   (id, exercise_id, weight, reps_or_duration, notes, "order")
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                params![
                    set.id,
                    set.exercise_id,
                    set.weight,
                    set.reps_or_duration,
                    set.notes,
                    set.order
                ],
            )?;
            Ok(set.id)
        }
    }
}
