//! In-process `TaskStore` that keeps the encoded collection in memory.
//!
//! Data still goes through the same encode/decode path as the file store.

use super::{decode_tasks, encode_tasks, StoreResult, TaskStore};
use crate::model::task::Task;
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};

#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    contents: RefCell<Option<String>>,
    saves: Cell<usize>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw text, as if it had been read from disk.
    pub fn with_raw(text: impl Into<String>) -> Self {
        Self {
            contents: RefCell::new(Some(text.into())),
            saves: Cell::new(0),
        }
    }

    /// Last saved (or seeded) text, `None` if nothing was ever stored.
    pub fn raw(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl TaskStore for MemoryTaskStore {
    fn load(&self, today: NaiveDate) -> Vec<Task> {
        self.contents
            .borrow()
            .as_deref()
            .and_then(|text| decode_tasks(text, today))
            .unwrap_or_default()
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        let encoded = encode_tasks(tasks)?;
        *self.contents.borrow_mut() = Some(encoded);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
