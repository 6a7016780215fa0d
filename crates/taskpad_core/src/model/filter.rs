//! List filter criteria.

use crate::model::task::{Priority, Task};
use std::fmt::{Display, Formatter};

/// Filter tabs offered by the list screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    #[default]
    All,
    /// Not yet completed.
    Pending,
    Completed,
    /// Priority is `High`, regardless of completion.
    HighPriority,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 4] = [
        TaskFilter::All,
        TaskFilter::Pending,
        TaskFilter::Completed,
        TaskFilter::HighPriority,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::HighPriority => "High",
        }
    }

    /// Parses a tab label case-insensitively.
    ///
    /// Unknown labels map to `All` so a bad criterion never hides every task.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "high" | "high_priority" | "highpriority" => Self::HighPriority,
            _ => Self::All,
        }
    }

    /// Returns whether `task` belongs in this view.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
            Self::HighPriority => task.priority == Priority::High,
        }
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Applies `filter` to `tasks`, preserving relative order.
pub fn filter_tasks(tasks: &[Task], filter: TaskFilter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_tasks, TaskFilter};
    use crate::model::task::{Priority, Task};
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Task> {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut a = Task::with_id("a", "a", created_at);
        a.priority = Priority::High;
        let mut b = Task::with_id("b", "b", created_at);
        b.completed = true;
        let mut c = Task::with_id("c", "c", created_at);
        c.priority = Priority::High;
        c.completed = true;
        let d = Task::with_id("d", "d", created_at);
        vec![a, b, c, d]
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.id.clone()).collect()
    }

    #[test]
    fn all_returns_exact_input() {
        let tasks = sample();
        let visible = filter_tasks(&tasks, TaskFilter::All);
        assert_eq!(ids(&visible), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn criteria_select_ordered_subsets() {
        let tasks = sample();
        assert_eq!(ids(&filter_tasks(&tasks, TaskFilter::Pending)), vec!["a", "d"]);
        assert_eq!(ids(&filter_tasks(&tasks, TaskFilter::Completed)), vec!["b", "c"]);
        assert_eq!(ids(&filter_tasks(&tasks, TaskFilter::HighPriority)), vec!["a", "c"]);
    }

    #[test]
    fn every_criterion_returns_an_ordered_subset() {
        let tasks = sample();
        for filter in TaskFilter::ALL {
            let visible = filter_tasks(&tasks, filter);
            let positions: Vec<usize> = visible
                .iter()
                .map(|task| tasks.iter().position(|t| t.id == task.id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{filter}");
        }
    }

    #[test]
    fn unknown_label_falls_back_to_all() {
        assert_eq!(TaskFilter::from_label("Someday"), TaskFilter::All);
        assert_eq!(TaskFilter::from_label(""), TaskFilter::All);
        assert_eq!(TaskFilter::from_label("high"), TaskFilter::HighPriority);
        assert_eq!(TaskFilter::from_label("PENDING"), TaskFilter::Pending);
    }
}
