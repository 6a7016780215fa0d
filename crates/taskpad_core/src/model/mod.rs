//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted `Task` record and its closed enumerations.
//! - Provide pure derivations (filtering, due-date status) over tasks.
//!
//! # Invariants
//! - Every task is identified by an opaque `TaskId` that is never reassigned.
//! - A task list never holds two tasks with the same `TaskId`.

pub mod due;
pub mod filter;
pub mod task;
