//! Core domain logic for the todo calendar.
//! This crate is the single source of truth for task invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod query;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    normalize_title, parse_date, ParsePriorityError, Priority, Task, TaskId, DATE_FORMAT,
    UNTITLED_TASK,
};
pub use query::{
    available_years, default_day, exclude_done, filter_by_day, filter_by_month, filter_by_year,
    group_by_day, group_by_month, month_days, sorted_tasks, visible_tasks, year_overview,
    DayGroup, MonthSummary, TaskCounts, TaskFilter, ViewScope,
};
pub use service::rollover::{advance_overdue, rollover_unfinished};
pub use service::task_session::{ServiceError, ServiceResult, TaskSession};
pub use store::{JsonFileStore, MemoryTaskStore, StoreError, StoreResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
