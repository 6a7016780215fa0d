//! Add-task flow: validate, build and persist one new task.
//!
//! # Invariants
//! - A blank title blocks submission before any storage access.
//! - New tasks are appended newest-first; the list screen picks them up on
//!   its next `load`.

use crate::model::task::{new_task_id, Priority, Task, TaskValidationError};
use crate::storage::KeyValueStore;
use crate::store::task_store::{TaskStore, WriteMode};
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Form input from the add screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTaskRequest {
    pub title: String,
    pub description: Option<String>,
    /// `None` means the user kept the default (`Low`).
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
}

impl NewTaskRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub enum AddTaskError {
    /// Input rejected; nothing was written.
    Validation(TaskValidationError),
    /// The store did not confirm the new task, e.g. after a storage failure.
    NotPersisted,
}

impl Display for AddTaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotPersisted => write!(f, "task could not be saved"),
        }
    }
}

impl Error for AddTaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotPersisted => None,
        }
    }
}

impl From<TaskValidationError> for AddTaskError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Builds a validated task from form input without touching storage.
pub fn build_task(
    request: NewTaskRequest,
    now: DateTime<Utc>,
) -> Result<Task, TaskValidationError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }

    let mut task = Task::with_id(new_task_id(), title, now);
    task.description = request
        .description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    task.priority = request.priority.unwrap_or_default();
    task.due_date = request.due_date;
    task.validate()?;
    Ok(task)
}

/// Validates `request` and appends the resulting task to `store`.
///
/// # Errors
/// - `AddTaskError::Validation` for a blank title; no write happens.
/// - `AddTaskError::NotPersisted` when the store result lacks the new task.
pub fn submit_task<S: KeyValueStore>(
    store: &TaskStore<S>,
    request: NewTaskRequest,
) -> Result<Task, AddTaskError> {
    let task = match build_task(request, Utc::now()) {
        Ok(task) => task,
        Err(err) => {
            info!("event=task_create module=service status=rejected reason={err}");
            return Err(err.into());
        }
    };

    let persisted = store.write(task.clone(), WriteMode::Append);
    if persisted.first().map(|first| first.id.as_str()) != Some(task.id.as_str()) {
        warn!(
            "event=task_create module=service status=error reason=not_persisted id={}",
            task.id
        );
        return Err(AddTaskError::NotPersisted);
    }

    info!(
        "event=task_create module=service status=ok id={} count={}",
        task.id,
        persisted.len()
    );
    Ok(task)
}
