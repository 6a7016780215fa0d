//! List screen controller.
//!
//! # Invariants
//! - Toggle and delete mutate in place; untouched tasks keep their order.
//! - `TaskEvent::Completed` fires once per false→true toggle, after persisting.
//! - Operations on unknown ids change nothing and write nothing.

use crate::model::filter::{filter_tasks, TaskFilter};
use crate::model::task::{Task, TaskId};
use crate::storage::KeyValueStore;
use crate::store::task_store::{TaskStore, WriteMode};
use log::{debug, error};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Notification for presentation-layer subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// A task moved from pending to completed.
    Completed { id: TaskId, title: String },
}

/// Result of [`TaskListController::toggle_completed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Completed,
    Reopened,
    NotFound,
    /// Storage rejected the write; the in-memory list is unchanged.
    NotPersisted,
}

/// Result of [`TaskListController::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Storage rejected the write; the task is still listed.
    NotPersisted,
}

/// In-memory view-model for the task list screen.
pub struct TaskListController<S> {
    store: TaskStore<S>,
    tasks: Vec<Task>,
    subscribers: Vec<Sender<TaskEvent>>,
}

impl<S: KeyValueStore> TaskListController<S> {
    /// Creates a controller with an empty mirror; call [`Self::load`] on focus.
    pub fn new(store: TaskStore<S>) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    /// Current in-memory list.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// Call whenever the list screen becomes visible: other entry points
    /// may have written storage since the last load.
    pub fn load(&mut self) -> &[Task] {
        self.tasks = self.store.read_all();
        debug!(
            "event=task_list_load module=service status=ok count={}",
            self.tasks.len()
        );
        &self.tasks
    }

    /// Filtered view of the in-memory list.
    pub fn visible(&self, filter: TaskFilter) -> Vec<&Task> {
        filter_tasks(&self.tasks, filter)
    }

    /// Registers a subscriber for [`TaskEvent`]s.
    pub fn subscribe(&mut self) -> Receiver<TaskEvent> {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        receiver
    }

    /// Flips `completed` on the task with `id` and persists the list.
    ///
    /// A failed write rolls the flag back; no event is sent.
    pub fn toggle_completed(&mut self, id: &str) -> ToggleOutcome {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("event=task_toggle module=service status=noop reason=not_found id={id}");
            return ToggleOutcome::NotFound;
        };
        self.tasks[index].completed = !self.tasks[index].completed;

        if !self.persist("task_toggle") {
            self.tasks[index].completed = !self.tasks[index].completed;
            return ToggleOutcome::NotPersisted;
        }

        let task = &self.tasks[index];
        if task.completed {
            let event = TaskEvent::Completed {
                id: task.id.clone(),
                title: task.title.clone(),
            };
            self.publish(event);
            ToggleOutcome::Completed
        } else {
            ToggleOutcome::Reopened
        }
    }

    /// Removes the task with `id` and persists the list.
    ///
    /// A failed write puts the task back in its old position.
    pub fn delete(&mut self, id: &str) -> DeleteOutcome {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("event=task_delete module=service status=noop reason=not_found id={id}");
            return DeleteOutcome::NotFound;
        };
        let removed = self.tasks.remove(index);

        if !self.persist("task_delete") {
            self.tasks.insert(index, removed);
            return DeleteOutcome::NotPersisted;
        }
        DeleteOutcome::Deleted
    }

    fn persist(&self, event: &str) -> bool {
        match self.store.try_write(self.tasks.as_slice(), WriteMode::Replace) {
            Ok(persisted) if persisted == self.tasks => true,
            Ok(persisted) => {
                error!(
                    "event={event} module=service status=error reason=persist_mismatch \
                     expected={} persisted={}",
                    self.tasks.len(),
                    persisted.len()
                );
                false
            }
            Err(err) => {
                error!(
                    "event={event} module=service status=error reason=persist_failed error={err}"
                );
                false
            }
        }
    }

    fn publish(&mut self, event: TaskEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}
