//! Whole-collection persistence for tasks.
//!
//! # Responsibility
//! - Define the `TaskStore` contract used by the session service.
//! - Decode stored text into normalized tasks and encode tasks back.
//!
//! # Invariants
//! - `load` never fails: missing or unreadable data yields an empty collection.
//! - `save` overwrites the full collection; there are no partial updates.
//! - Loaded collections never contain duplicate ids.

use crate::model::task::{new_task_id, Task};
use chrono::NaiveDate;
use log::warn;
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_store;
mod memory_store;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Write-path error for task persistence.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write task file `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Repository interface for the full task collection.
pub trait TaskStore {
    /// Reads every stored task, normalizing each record against `today`.
    fn load(&self, today: NaiveDate) -> Vec<Task>;
    /// Replaces the stored collection with `tasks`.
    fn save(&self, tasks: &[Task]) -> StoreResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn load(&self, today: NaiveDate) -> Vec<Task> {
        (**self).load(today)
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        (**self).save(tasks)
    }
}

/// Encodes tasks as an indented JSON array.
pub(crate) fn encode_tasks(tasks: &[Task]) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Decodes stored text into normalized tasks.
///
/// Returns `None` when the text is not a JSON array. Non-object entries are
/// skipped and repeated ids are replaced with fresh ones.
pub(crate) fn decode_tasks(text: &str, today: NaiveDate) -> Option<Vec<Task>> {
    let items = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("event=store_decode module=store status=error error_code=not_an_array");
            return None;
        }
        Err(err) => {
            warn!(
                "event=store_decode module=store status=error error_code=invalid_json line={} column={}",
                err.line(),
                err.column()
            );
            return None;
        }
    };

    let mut skipped = 0usize;
    let mut tasks: Vec<Task> = items
        .iter()
        .filter_map(|item| {
            let task = Task::normalize(item, today);
            if task.is_none() {
                skipped += 1;
            }
            task
        })
        .collect();
    if skipped > 0 {
        warn!("event=store_decode module=store status=skip skipped_records={skipped}");
    }

    let reassigned = dedupe_ids(&mut tasks);
    if reassigned > 0 {
        warn!("event=store_decode module=store status=repair reassigned_ids={reassigned}");
    }

    Some(tasks)
}

/// Gives every repeated id after its first occurrence a fresh id.
fn dedupe_ids(tasks: &mut [Task]) -> usize {
    let mut seen = HashSet::with_capacity(tasks.len());
    let mut reassigned = 0;
    for task in tasks.iter_mut() {
        if !seen.insert(task.id.clone()) {
            task.id = new_task_id();
            seen.insert(task.id.clone());
            reassigned += 1;
        }
    }
    reassigned
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, encode_tasks};
    use crate::model::task::{Priority, Task};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn decode_rejects_non_array_roots() {
        assert!(decode_tasks(r#"{"id":"a"}"#, day(2024, 1, 1)).is_none());
        assert!(decode_tasks("not json", day(2024, 1, 1)).is_none());
    }

    #[test]
    fn decode_skips_non_objects_and_repairs_duplicate_ids() {
        let text = r#"[1, {"id":"a","title":"x"}, "str", {"id":"a","title":"y"}]"#;
        let tasks = decode_tasks(text, day(2024, 1, 1)).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "a");
        assert_ne!(tasks[1].id, "a");
        assert_eq!(tasks[1].title, "y");
    }

    #[test]
    fn encode_uses_two_space_indent_and_fixed_field_order() {
        let mut task = Task::create("Écrire", day(2024, 5, 6), Priority::P1, "");
        task.id = "t-1".to_string();
        let text = encode_tasks(&[task]).unwrap();
        let expected = "[\n  {\n    \"id\": \"t-1\",\n    \"title\": \"Écrire\",\n    \"date\": \"2024-05-06\",\n    \"priority\": \"P1\",\n    \"notes\": \"\",\n    \"done\": false\n  }\n]";
        assert_eq!(text, expected);
    }
}
