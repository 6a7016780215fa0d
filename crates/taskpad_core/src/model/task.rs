//! Task record and creation-time validation.
//!
//! # Responsibility
//! - Define the canonical persisted shape of one to-do item.
//! - Decode legacy and partial records leniently.
//!
//! # Invariants
//! - `id` and `created_at` are assigned once at creation and never change.
//! - `due_date` is a calendar date without timezone, stored as `YYYY-MM-DD`.
//! - Missing optional fields decode to their defaults instead of failing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, globally unique task identifier.
///
/// Kept as a string so ids written by older clients still load.
pub type TaskId = String;

/// Storage format for `Task::due_date`.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display format for due dates on the list screen (`Mon Jun 10 2024`).
pub const DUE_LABEL_FORMAT: &str = "%a %b %d %Y";

/// Generates a fresh task id.
///
/// UUID v4 carries 122 random bits, so ids created within the same
/// millisecond still never collide.
pub fn new_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}

/// Task urgency as chosen on the add screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Stable label used in storage and UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Parses a label case-insensitively.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failures for task creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Id is empty.
    EmptyId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::EmptyId => write!(f, "task id cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One persisted to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_description"
    )]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_priority")]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "due_date_serde")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task with a generated id and the current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(new_task_id(), title, Utc::now())
    }

    /// Creates a pending task with caller-provided identity.
    ///
    /// Used by import paths and tests where id and creation time are fixed.
    pub fn with_id(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            priority: Priority::Low,
            due_date: None,
            completed: false,
            created_at,
        }
    }

    /// Checks creation-time invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Formats the due date for display, e.g. `Mon Jun 10 2024`.
    pub fn due_label(&self) -> Option<String> {
        self.due_date
            .map(|date| date.format(DUE_LABEL_FORMAT).to_string())
    }
}

/// Parses a stored or user-entered due date.
///
/// Accepts `YYYY-MM-DD`, the legacy `Mon Jun 10 2024` form and RFC 3339
/// instants (reduced to their UTC calendar date).
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DUE_LABEL_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|instant| instant.with_timezone(&Utc).date_naive())
}

fn deserialize_description<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

fn deserialize_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .and_then(Priority::from_label)
        .unwrap_or_default())
}

mod due_date_serde {
    use super::{parse_due_date, DUE_DATE_FORMAT};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DUE_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().and_then(parse_due_date))
    }
}
