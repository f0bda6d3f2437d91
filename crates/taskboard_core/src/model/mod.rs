//! Task domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep derived text metadata out of the persisted shape.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod task;
