//! Carry-forward of overdue unfinished tasks.
//!
//! # Invariants
//! - Only unfinished tasks dated strictly before `today` are touched.
//! - Only `date` changes; nothing else is rewritten.
//! - The collection is persisted only when at least one task moved.

use crate::model::task::Task;
use crate::store::{StoreResult, TaskStore};
use chrono::NaiveDate;
use log::info;

/// Moves every overdue unfinished task to `today`. Returns how many moved.
pub fn advance_overdue(tasks: &mut [Task], today: NaiveDate) -> usize {
    let mut moved = 0;
    for task in tasks.iter_mut().filter(|task| task.is_overdue(today)) {
        task.date = today;
        moved += 1;
    }
    moved
}

/// Runs `advance_overdue` and saves the full collection when anything moved.
pub fn rollover_unfinished<S: TaskStore>(
    store: &S,
    tasks: &mut [Task],
    today: NaiveDate,
) -> StoreResult<usize> {
    let moved = advance_overdue(tasks, today);
    if moved == 0 {
        return Ok(0);
    }

    store.save(tasks)?;
    info!(
        "event=rollover module=service status=ok moved={} today={}",
        moved, today
    );
    Ok(moved)
}
