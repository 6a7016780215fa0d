//! FFI use-case API for the task list and add-task screens.
//!
//! # Responsibility
//! - Expose stable, screen-level task operations to Dart via FRB.
//! - Translate core results into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call reloads from storage before mutating, so a screen never
//!   acts on a stale snapshot.

use chrono::{Local, NaiveDate};
use std::path::Path;
use std::sync::OnceLock;
use taskpad_core::db::open_db;
use taskpad_core::{
    core_version as core_version_inner, due_status, init_logging as init_logging_inner,
    parse_due_date, ping as ping_inner, submit_task, CoreConfig, DeleteOutcome, NewTaskRequest,
    Priority, SqliteKeyValueStore, Task, TaskFilter, TaskListController, TaskStore,
    ToggleOutcome, DUE_DATE_FORMAT,
};

static CONFIG: OnceLock<CoreConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive. Blank uses
///   `TASKPAD_LOG_LEVEL`, else the build-mode default.
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns an empty string on success, an error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = non_blank(Some(level)).unwrap_or_else(|| config().log_level.to_string());
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the task list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// `Low|Medium|High`.
    pub priority: String,
    /// Stored form, `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// Display form, e.g. `Mon Jun 10 2024`.
    pub due_label: Option<String>,
    /// `none|overdue|due_soon|normal`.
    pub due_status: String,
    pub completed: bool,
    /// RFC 3339 creation instant.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
    /// Filter actually applied after label normalization.
    pub applied_filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    pub task_id: Option<String>,
    /// Set only when a toggle moved the task to completed.
    pub celebrate: bool,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: String) -> Self {
        Self {
            ok: true,
            task_id: Some(task_id),
            celebrate: false,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            celebrate: false,
            message: message.into(),
        }
    }
}

/// Loads the list and applies a filter tab (`All|Pending|Completed|High`).
///
/// Unknown filter labels show every task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list(filter: String) -> TaskListResponse {
    task_list_at(&config().db_path, &filter, Local::now().date_naive())
}

/// Creates a task from the add screen.
///
/// `priority` defaults to `Low` when absent or blank; `due_date` is
/// `YYYY-MM-DD`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(
    title: String,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
) -> TaskActionResponse {
    task_create_at(&config().db_path, title, description, priority, due_date)
}

/// Flips a task between pending and completed.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> TaskActionResponse {
    task_toggle_at(&config().db_path, &id)
}

/// Deletes a task; unknown ids are a no-op reported as failure.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> TaskActionResponse {
    task_delete_at(&config().db_path, &id)
}

fn task_list_at(db_path: &Path, filter: &str, today: NaiveDate) -> TaskListResponse {
    let filter = TaskFilter::from_label(filter);
    let loaded = with_controller(db_path, |controller| {
        controller.load();
        controller
            .visible(filter)
            .into_iter()
            .map(|task| to_task_item(task, today))
            .collect::<Vec<_>>()
    });

    match loaded {
        Ok(items) => {
            let message = if items.is_empty() {
                "No tasks yet.".to_string()
            } else {
                format!("{} task(s).", items.len())
            };
            TaskListResponse {
                ok: true,
                items,
                message,
                applied_filter: filter.label().to_string(),
            }
        }
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("task_list failed: {err}"),
            applied_filter: filter.label().to_string(),
        },
    }
}

fn task_create_at(
    db_path: &Path,
    title: String,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
) -> TaskActionResponse {
    let priority = match non_blank(priority) {
        Some(label) => match Priority::from_label(&label) {
            Some(priority) => Some(priority),
            None => return TaskActionResponse::failure(format!("unknown priority `{label}`")),
        },
        None => None,
    };
    let due_date = match non_blank(due_date) {
        Some(raw) => match parse_due_date(&raw) {
            Some(date) => Some(date),
            None => return TaskActionResponse::failure(format!("invalid due date `{raw}`")),
        },
        None => None,
    };
    let request = NewTaskRequest {
        title,
        description,
        priority,
        due_date,
    };

    match with_store(db_path, |store| submit_task(&store, request)) {
        Ok(Ok(task)) => TaskActionResponse::success("Task created.", task.id),
        Ok(Err(err)) => TaskActionResponse::failure(format!("task_create failed: {err}")),
        Err(err) => TaskActionResponse::failure(format!("task_create failed: {err}")),
    }
}

fn task_toggle_at(db_path: &Path, id: &str) -> TaskActionResponse {
    let toggled = with_controller(db_path, |controller| {
        let events = controller.subscribe();
        controller.load();
        let outcome = controller.toggle_completed(id);
        (outcome, events.try_recv().is_ok())
    });

    match toggled {
        Ok((ToggleOutcome::NotFound, _)) => {
            TaskActionResponse::failure(format!("task not found: {id}"))
        }
        Ok((ToggleOutcome::Completed, celebrate)) => TaskActionResponse {
            celebrate,
            ..TaskActionResponse::success("Task completed.", id.to_string())
        },
        Ok((ToggleOutcome::Reopened, _)) => {
            TaskActionResponse::success("Task reopened.", id.to_string())
        }
        Ok((ToggleOutcome::NotPersisted, _)) => {
            TaskActionResponse::failure(format!("task_toggle failed: could not save {id}"))
        }
        Err(err) => TaskActionResponse::failure(format!("task_toggle failed: {err}")),
    }
}

fn task_delete_at(db_path: &Path, id: &str) -> TaskActionResponse {
    let deleted = with_controller(db_path, |controller| {
        controller.load();
        controller.delete(id)
    });

    match deleted {
        Ok(DeleteOutcome::Deleted) => {
            TaskActionResponse::success("Task deleted.", id.to_string())
        }
        Ok(DeleteOutcome::NotFound) => {
            TaskActionResponse::failure(format!("task not found: {id}"))
        }
        Ok(DeleteOutcome::NotPersisted) => {
            TaskActionResponse::failure(format!("task_delete failed: could not save {id}"))
        }
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

fn config() -> &'static CoreConfig {
    CONFIG.get_or_init(CoreConfig::from_env)
}

fn with_store<T>(
    db_path: &Path,
    f: impl FnOnce(TaskStore<SqliteKeyValueStore<'_>>) -> T,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("task DB open failed: {err}"))?;
    let storage =
        SqliteKeyValueStore::try_new(&conn).map_err(|err| format!("storage init failed: {err}"))?;
    Ok(f(TaskStore::from_config(storage, config())))
}

fn with_controller<T>(
    db_path: &Path,
    f: impl FnOnce(&mut TaskListController<SqliteKeyValueStore<'_>>) -> T,
) -> Result<T, String> {
    with_store(db_path, |store| {
        let mut controller = TaskListController::new(store);
        f(&mut controller)
    })
}

fn to_task_item(task: &Task, today: NaiveDate) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        priority: task.priority.label().to_string(),
        due_date: task
            .due_date
            .map(|date| date.format(DUE_DATE_FORMAT).to_string()),
        due_label: task.due_label(),
        due_status: due_status(task.due_date, task.completed, today)
            .label()
            .to_string(),
        completed: task.completed,
        created_at: task.created_at.to_rfc3339(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
