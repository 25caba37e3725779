//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the backing file.
//! - Decode loose JSON records into that record without ever failing.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is never blank; blank input becomes `UNTITLED_TASK`.
//! - `priority` is always one of `P0..P3`.
//! - `date` is always a valid calendar date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for every task.
///
/// Kept as plain text because imported files may carry non-UUID ids.
pub type TaskId = String;

/// Placeholder used when a title is blank after trimming.
pub const UNTITLED_TASK: &str = "Untitled task";

/// Wire format for `Task::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ordered urgency levels. `P0` is the most urgent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    P0,
    P1,
    #[default]
    P2,
    P3,
}

impl Priority {
    /// All priorities in rank order.
    pub const ALL: [Priority; 4] = [Priority::P0, Priority::P1, Priority::P2, Priority::P3];

    /// Ordinal used as sort tiebreaker (`P0 == 0`).
    pub fn rank(self) -> u8 {
        match self {
            Self::P0 => 0,
            Self::P1 => 1,
            Self::P2 => 2,
            Self::P3 => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }

    /// Exact wire match. Anything else is not a priority.
    fn from_wire(value: &str) -> Option<Self> {
        match value {
            "P0" => Some(Self::P0),
            "P1" => Some(Self::P1),
            "P2" => Some(Self::P2),
            "P3" => Some(Self::P3),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for user-typed priority text (CLI input only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriorityError(pub String);

impl Display for ParsePriorityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported priority `{}`; expected P0|P1|P2|P3", self.0)
    }
}

impl std::error::Error for ParsePriorityError {}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_wire(value.trim().to_ascii_uppercase().as_str())
            .ok_or_else(|| ParsePriorityError(value.to_string()))
    }
}

/// Canonical task record.
///
/// Field order here is the field order in the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    pub priority: Priority,
    pub notes: String,
    pub done: bool,
}

impl Task {
    /// Creates a new open task with a generated stable ID.
    ///
    /// # Invariants
    /// - `done` starts as `false`.
    /// - Title and notes are trimmed; a blank title becomes `UNTITLED_TASK`.
    pub fn create(title: &str, date: NaiveDate, priority: Priority, notes: &str) -> Self {
        Self {
            id: new_task_id(),
            title: normalize_title(title),
            date,
            priority,
            notes: notes.trim().to_string(),
            done: false,
        }
    }

    /// Decodes one loose record into a task.
    ///
    /// Returns `None` only when `raw` is not a JSON object. For objects this
    /// is total: every missing or malformed field is replaced by its default
    /// (`today` for dates, `P2` for priority, a fresh id, `false` for done).
    pub fn normalize(raw: &Value, today: NaiveDate) -> Option<Self> {
        let record = raw.as_object()?;

        let id = record
            .get("id")
            .and_then(scalar_text)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(new_task_id);
        let title = normalize_title(
            &record
                .get("title")
                .and_then(scalar_text)
                .unwrap_or_default(),
        );
        let date = record
            .get("date")
            .and_then(Value::as_str)
            .and_then(parse_date)
            .unwrap_or(today);
        let priority = record
            .get("priority")
            .and_then(Value::as_str)
            .and_then(Priority::from_wire)
            .unwrap_or_default();
        let notes = record
            .get("notes")
            .and_then(scalar_text)
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        let done = record.get("done").map(is_truthy).unwrap_or(false);

        Some(Self {
            id,
            title,
            date,
            priority,
            notes,
            done,
        })
    }

    /// Returns whether this task is unfinished and dated before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.done && self.date < today
    }
}

/// Trims a title and substitutes the placeholder when nothing is left.
pub fn normalize_title(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNTITLED_TASK.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a strict `YYYY-MM-DD` date.
///
/// Exactly ten bytes, zero padded, no sign and no surrounding whitespace.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub(crate) fn new_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

mod iso_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
