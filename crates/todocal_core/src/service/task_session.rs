//! Task session service.
//!
//! # Responsibility
//! - Own the in-memory task collection for one running session.
//! - Provide the only mutation entry points (add, toggle, delete, reload).
//! - Answer view queries through the query engine.
//!
//! # Invariants
//! - Every mutation is saved before the call returns.
//! - Calls that change nothing (blank title, unknown id) do not save.
//! - Rollover runs on every load and again whenever the clock crosses into
//!   a new day between interactions.

use crate::clock::Clock;
use crate::model::task::{Priority, Task, TaskId};
use crate::query::{self, TaskCounts, TaskFilter};
use crate::service::rollover::rollover_unfinished;
use crate::store::{StoreError, TaskStore};
use chrono::NaiveDate;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by session operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Persisting the collection failed.
    Store(StoreError),
    /// No task id equals or starts with the given text.
    UnknownTask(String),
    /// More than one task id starts with the given prefix.
    AmbiguousId { prefix: String, matches: usize },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::UnknownTask(id) => write!(f, "task not found: {id}"),
            Self::AmbiguousId { prefix, matches } => {
                write!(f, "task id prefix `{prefix}` matches {matches} tasks")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Session facade over a task store.
pub struct TaskSession<S: TaskStore, C: Clock> {
    store: S,
    clock: C,
    tasks: Vec<Task>,
    checked_on: NaiveDate,
    last_rollover: usize,
}

impl<S: TaskStore, C: Clock> TaskSession<S, C> {
    /// Loads the collection and carries overdue tasks forward.
    pub fn open(store: S, clock: C) -> ServiceResult<Self> {
        let today = clock.today();
        let mut session = Self {
            tasks: Vec::new(),
            checked_on: today,
            last_rollover: 0,
            store,
            clock,
        };
        session.load_and_rollover(today)?;
        info!(
            "event=session_open module=service status=ok count={} rolled_over={}",
            session.tasks.len(),
            session.last_rollover
        );
        Ok(session)
    }

    /// Discards the in-memory collection and loads it again.
    ///
    /// Returns the rollover count of the fresh load.
    pub fn reload(&mut self) -> ServiceResult<usize> {
        let today = self.clock.today();
        self.load_and_rollover(today)?;
        info!(
            "event=session_reload module=service status=ok count={} rolled_over={}",
            self.tasks.len(),
            self.last_rollover
        );
        Ok(self.last_rollover)
    }

    /// Runs rollover again if the date moved since the last check.
    ///
    /// Returns the number of tasks carried forward (zero on the same day).
    pub fn refresh_day(&mut self) -> ServiceResult<usize> {
        let today = self.clock.today();
        if today == self.checked_on {
            return Ok(0);
        }

        debug!(
            "event=day_change module=service status=start from={} to={}",
            self.checked_on, today
        );
        self.checked_on = today;
        let moved = rollover_unfinished(&self.store, &mut self.tasks, today)?;
        if moved > 0 {
            self.last_rollover = moved;
        }
        Ok(moved)
    }

    /// Tasks matching `filter`, in canonical display order.
    pub fn visible_tasks(&mut self, filter: &TaskFilter) -> ServiceResult<Vec<Task>> {
        self.refresh_day()?;
        Ok(query::visible_tasks(&self.tasks, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Appends a new open task and saves.
    ///
    /// A blank title is a no-op and returns `Ok(None)`.
    pub fn add_task(
        &mut self,
        title: &str,
        date: NaiveDate,
        priority: Priority,
        notes: &str,
    ) -> ServiceResult<Option<TaskId>> {
        if title.trim().is_empty() {
            debug!("event=task_add module=service status=skip reason=blank_title");
            return Ok(None);
        }
        self.refresh_day()?;

        let task = Task::create(title, date, priority, notes);
        let id = task.id.clone();
        self.tasks.push(task);
        self.store.save(&self.tasks)?;
        info!(
            "event=task_add module=service status=ok task_id={} priority={}",
            id, priority
        );
        Ok(Some(id))
    }

    /// Sets the completion flag of one task and saves.
    ///
    /// Returns `false` without saving when no task has `id`.
    pub fn toggle_task(&mut self, id: &str, done: bool) -> ServiceResult<bool> {
        self.refresh_day()?;
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_toggle module=service status=skip reason=not_found task_id={id}");
            return Ok(false);
        };

        task.done = done;
        self.store.save(&self.tasks)?;
        info!("event=task_toggle module=service status=ok task_id={id} done={done}");
        Ok(true)
    }

    /// Removes one task and saves the remainder.
    ///
    /// Returns `false` without saving when no task has `id`.
    pub fn delete_task(&mut self, id: &str) -> ServiceResult<bool> {
        self.refresh_day()?;
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_delete module=service status=skip reason=not_found task_id={id}");
            return Ok(false);
        }

        self.store.save(&self.tasks)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(true)
    }

    /// Resolves an exact id or a unique id prefix.
    pub fn resolve_id(&self, prefix: &str) -> ServiceResult<TaskId> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(ServiceError::UnknownTask(prefix.to_string()));
        }
        if let Some(task) = self.tasks.iter().find(|task| task.id == prefix) {
            return Ok(task.id.clone());
        }

        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.id.starts_with(prefix))
            .collect();
        match matches.as_slice() {
            [task] => Ok(task.id.clone()),
            [] => Err(ServiceError::UnknownTask(prefix.to_string())),
            many => Err(ServiceError::AmbiguousId {
                prefix: prefix.to_string(),
                matches: many.len(),
            }),
        }
    }

    /// Tasks in storage (insertion) order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::from_tasks(&self.tasks)
    }

    pub fn years(&self) -> Vec<i32> {
        query::available_years(&self.tasks, self.checked_on)
    }

    /// Date of the most recent rollover check.
    pub fn today(&self) -> NaiveDate {
        self.checked_on
    }

    /// Tasks moved by the last load, or by a later day-change rollover.
    pub fn last_rollover(&self) -> usize {
        self.last_rollover
    }

    fn load_and_rollover(&mut self, today: NaiveDate) -> ServiceResult<()> {
        self.tasks = self.store.load(today);
        self.checked_on = today;
        self.last_rollover = rollover_unfinished(&self.store, &mut self.tasks, today)?;
        Ok(())
    }
}
