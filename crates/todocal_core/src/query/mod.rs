//! Read-only orderings, filters and calendar groupings over tasks.
//!
//! # Responsibility
//! - Derive the canonical display order.
//! - Partition tasks into year/month/day views and count them.
//!
//! # Invariants
//! - Nothing here mutates or persists tasks.
//! - Group keys are `YYYY-MM` (month) and `YYYY-MM-DD` (day); within a group
//!   the input order is preserved.

use crate::model::task::{Priority, Task};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar window shown by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScope {
    Year(i32),
    Month { year: i32, month: u32 },
    Day(NaiveDate),
}

/// View parameters supplied by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskFilter {
    pub scope: ViewScope,
    /// When `false`, completed tasks are dropped before scoping.
    pub include_done: bool,
}

/// Aggregate counters over a task sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub done: usize,
    pub remaining: usize,
    /// Indexed by `Priority::rank()`.
    pub by_priority: [usize; 4],
}

impl TaskCounts {
    pub fn from_tasks<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut counts = Self::default();
        for task in tasks {
            counts.total += 1;
            if task.done {
                counts.done += 1;
            }
            counts.by_priority[usize::from(task.priority.rank())] += 1;
        }
        counts.remaining = counts.total - counts.done;
        counts
    }

    pub fn for_priority(&self, priority: Priority) -> usize {
        self.by_priority[usize::from(priority.rank())]
    }
}

/// One day bucket inside a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup<'a> {
    /// `YYYY-MM-DD`
    pub key: String,
    pub tasks: Vec<&'a Task>,
    pub counts: TaskCounts,
}

/// One month of a year overview. Present even when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary<'a> {
    /// `YYYY-MM`
    pub key: String,
    pub month: u32,
    pub abbr: &'static str,
    pub tasks: Vec<&'a Task>,
    pub counts: TaskCounts,
    pub days: Vec<DayGroup<'a>>,
}

/// Canonical display order: date, then priority rank, then lowercase title.
///
/// The sort is stable, so full ties keep their input order.
pub fn sorted_tasks<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    sorted.sort_by_cached_key(|task| (task.date, task.priority.rank(), task.title.to_lowercase()));
    sorted
}

pub fn exclude_done<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|task| !task.done).collect()
}

pub fn filter_by_year<'a, I>(tasks: I, year: i32) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|task| task.date.year() == year)
        .collect()
}

pub fn filter_by_month<'a, I>(tasks: I, year: i32, month: u32) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|task| task.date.year() == year && task.date.month() == month)
        .collect()
}

pub fn filter_by_day<'a, I>(tasks: I, day: NaiveDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|task| task.date == day).collect()
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn day_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Partitions by `YYYY-MM`. Callers pass already-sorted input.
pub fn group_by_month<'a, I>(tasks: I) -> BTreeMap<String, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    group_by(tasks, |task| month_key(task.date))
}

/// Partitions by `YYYY-MM-DD`. Callers pass already-sorted input.
pub fn group_by_day<'a, I>(tasks: I) -> BTreeMap<String, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    group_by(tasks, |task| day_key(task.date))
}

fn group_by<'a, I, F>(tasks: I, key: F) -> BTreeMap<String, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
    F: Fn(&Task) -> String,
{
    let mut groups: BTreeMap<String, Vec<&'a Task>> = BTreeMap::new();
    for task in tasks {
        groups.entry(key(task)).or_default().push(task);
    }
    groups
}

/// Tasks shown for `filter`, in canonical display order.
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let candidates: Vec<&Task> = if filter.include_done {
        tasks.iter().collect()
    } else {
        exclude_done(tasks)
    };

    let scoped = match filter.scope {
        ViewScope::Year(year) => filter_by_year(candidates, year),
        ViewScope::Month { year, month } => filter_by_month(candidates, year, month),
        ViewScope::Day(day) => filter_by_day(candidates, day),
    };
    sorted_tasks(scoped)
}

/// Day buckets of one month, in calendar order.
pub fn month_days(tasks: &[Task], year: i32, month: u32, include_done: bool) -> Vec<DayGroup<'_>> {
    let filter = TaskFilter {
        scope: ViewScope::Month { year, month },
        include_done,
    };
    day_groups(visible_tasks(tasks, &filter))
}

/// All twelve months of `year`, empty months included.
pub fn year_overview(tasks: &[Task], year: i32, include_done: bool) -> Vec<MonthSummary<'_>> {
    let filter = TaskFilter {
        scope: ViewScope::Year(year),
        include_done,
    };
    let mut by_month = group_by_month(visible_tasks(tasks, &filter));

    (1..=12u32)
        .map(|month| {
            let key = format!("{year:04}-{month:02}");
            let month_tasks = by_month.remove(&key).unwrap_or_default();
            MonthSummary {
                counts: TaskCounts::from_tasks(month_tasks.iter().copied()),
                days: day_groups(month_tasks.iter().copied()),
                abbr: MONTH_ABBR[(month - 1) as usize],
                month,
                key,
                tasks: month_tasks,
            }
        })
        .collect()
}

fn day_groups<'a, I>(tasks: I) -> Vec<DayGroup<'a>>
where
    I: IntoIterator<Item = &'a Task>,
{
    group_by_day(tasks)
        .into_iter()
        .map(|(key, tasks)| DayGroup {
            counts: TaskCounts::from_tasks(tasks.iter().copied()),
            key,
            tasks,
        })
        .collect()
}

/// Distinct task years plus the current year, ascending.
pub fn available_years(tasks: &[Task], today: NaiveDate) -> Vec<i32> {
    let mut years: Vec<i32> = tasks.iter().map(|task| task.date.year()).collect();
    years.push(today.year());
    years.sort_unstable();
    years.dedup();
    years
}

/// Default day selection for a year: today's month, day clamped to 28.
pub fn default_day(year: i32, today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, today.month(), today.day().min(28)).unwrap_or(today)
}

pub fn month_abbr(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_ABBR.get(index as usize))
        .copied()
}
