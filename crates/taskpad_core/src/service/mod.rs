//! Screen-level use cases over the task store.
//!
//! # Responsibility
//! - Hold the list screen's in-memory mirror and apply user mutations.
//! - Validate and submit new tasks from the add screen.
//! - Publish completion events for presentation-side effects.
//!
//! # Invariants
//! - The in-memory list is a cache; `load` always replaces it from storage.
//! - Services never bypass `TaskStore` to reach storage.

pub mod add_task;
pub mod effects;
pub mod task_list;
