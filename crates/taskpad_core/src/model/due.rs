//! Due-date status classification for list styling.

use chrono::NaiveDate;

/// Number of days ahead (inclusive) that counts as "due soon".
pub const DUE_SOON_DAYS: i64 = 2;

/// Presentation status derived from a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DueStatus {
    /// No due date, or the task is already completed.
    None,
    Overdue,
    DueSoon,
    Normal,
}

impl DueStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Overdue => "overdue",
            Self::DueSoon => "due_soon",
            Self::Normal => "normal",
        }
    }
}

/// Classifies a due date relative to `today`.
///
/// Completed tasks never report `Overdue`.
pub fn due_status(due_date: Option<NaiveDate>, completed: bool, today: NaiveDate) -> DueStatus {
    let Some(due) = due_date else {
        return DueStatus::None;
    };
    if completed {
        return DueStatus::None;
    }

    let days_left = (due - today).num_days();
    if days_left < 0 {
        DueStatus::Overdue
    } else if days_left <= DUE_SOON_DAYS {
        DueStatus::DueSoon
    } else {
        DueStatus::Normal
    }
}
