//! Task domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by store and organizer logic.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod task;
