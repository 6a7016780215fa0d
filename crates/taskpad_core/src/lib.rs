//! Core domain logic for Taskpad.
//! This crate is the single source of truth for task list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;

pub use config::{CoreConfig, LEGACY_STORAGE_KEYS, TASKS_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::due::{due_status, DueStatus, DUE_SOON_DAYS};
pub use model::filter::{filter_tasks, TaskFilter};
pub use model::task::{
    new_task_id, parse_due_date, Priority, Task, TaskId, TaskValidationError, DUE_DATE_FORMAT,
    DUE_LABEL_FORMAT,
};
pub use service::add_task::{build_task, submit_task, AddTaskError, NewTaskRequest};
pub use service::effects::{dispatch_completion_effects, CompletionEffects};
pub use service::task_list::{DeleteOutcome, TaskEvent, TaskListController, ToggleOutcome};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use store::task_store::{
    decode_task_list, StoreError, StoreResult, TaskInput, TaskStore, WriteMode,
};

/// Minimal health-check API for bridge integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
