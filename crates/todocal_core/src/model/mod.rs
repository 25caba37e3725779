//! Domain model for calendar tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the loose-record decoding rules applied to persisted data.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod task;
