//! Task list store.
//!
//! # Invariants
//! - Writes always target the canonical key; legacy keys are read-only.
//! - `Append` places incoming tasks before existing ones, keeping the
//!   incoming block's own order.
//! - Malformed persisted data reads as an empty list, never as an error.

use crate::config::{CoreConfig, LEGACY_STORAGE_KEYS, TASKS_STORAGE_KEY};
use crate::model::task::Task;
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Serialization(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to serialize task list: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// How a write combines with what is already persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Prepend the input to the persisted list.
    Append,
    /// Persist exactly the input.
    Replace,
}

impl WriteMode {
    fn label(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Replace => "replace",
        }
    }
}

/// A single task or a whole list, as accepted by [`TaskStore::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskInput {
    One(Task),
    Many(Vec<Task>),
}

impl TaskInput {
    fn into_vec(self) -> Vec<Task> {
        match self {
            Self::One(task) => vec![task],
            Self::Many(tasks) => tasks,
        }
    }
}

impl From<Task> for TaskInput {
    fn from(value: Task) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Task>> for TaskInput {
    fn from(value: Vec<Task>) -> Self {
        Self::Many(value)
    }
}

impl From<&[Task]> for TaskInput {
    fn from(value: &[Task]) -> Self {
        Self::Many(value.to_vec())
    }
}

/// Task list persistence over a [`KeyValueStore`].
pub struct TaskStore<S> {
    storage: S,
    key: String,
    legacy_keys: Vec<String>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Creates a store on the canonical key with the default legacy fallback.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: TASKS_STORAGE_KEY.to_string(),
            legacy_keys: LEGACY_STORAGE_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Creates a store using keys from `config`.
    pub fn from_config(storage: S, config: &CoreConfig) -> Self {
        Self {
            storage,
            key: config.storage_key.clone(),
            legacy_keys: config.legacy_keys.clone(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the persisted list, or `[]` on any failure.
    pub fn read_all(&self) -> Vec<Task> {
        match self.try_read_all() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    "event=task_store_read module=store status=error key={} error={}",
                    self.key, err
                );
                Vec::new()
            }
        }
    }

    /// Persists `input` and returns the resulting list, or `[]` on failure.
    pub fn write(&self, input: impl Into<TaskInput>, mode: WriteMode) -> Vec<Task> {
        match self.try_write(input, mode) {
            Ok(tasks) => tasks,
            Err(err) => {
                error!(
                    "event=task_store_write module=store status=error key={} mode={} error={}",
                    self.key,
                    mode.label(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Reads the persisted list, surfacing storage failures.
    ///
    /// Malformed data is not a failure: it decodes to `[]` (or to the
    /// well-formed subset of array elements).
    pub fn try_read_all(&self) -> StoreResult<Vec<Task>> {
        if let Some(raw) = self.storage.get(&self.key)? {
            let tasks = decode_task_list(&raw);
            debug!(
                "event=task_store_read module=store status=ok key={} count={}",
                self.key,
                tasks.len()
            );
            return Ok(tasks);
        }

        for legacy_key in &self.legacy_keys {
            if let Some(raw) = self.storage.get(legacy_key)? {
                let tasks = decode_task_list(&raw);
                info!(
                    "event=task_store_read module=store status=ok key={} source=legacy count={}",
                    legacy_key,
                    tasks.len()
                );
                return Ok(tasks);
            }
        }

        debug!(
            "event=task_store_read module=store status=ok key={} count=0 source=empty",
            self.key
        );
        Ok(Vec::new())
    }

    /// Persists `input` according to `mode`, surfacing failures.
    ///
    /// In `Append` mode a storage failure while reading the current list
    /// aborts the write, so existing data is never overwritten blind.
    pub fn try_write(
        &self,
        input: impl Into<TaskInput>,
        mode: WriteMode,
    ) -> StoreResult<Vec<Task>> {
        let incoming = dedupe_by_id(input.into().into_vec());

        let tasks = match mode {
            WriteMode::Replace => incoming,
            WriteMode::Append => {
                let incoming_ids: HashSet<&str> =
                    incoming.iter().map(|task| task.id.as_str()).collect();
                let existing: Vec<Task> = self
                    .try_read_all()?
                    .into_iter()
                    .filter(|task| !incoming_ids.contains(task.id.as_str()))
                    .collect();
                let mut combined = incoming;
                combined.extend(existing);
                combined
            }
        };

        let encoded = serde_json::to_string(&tasks)?;
        self.storage.set(&self.key, &encoded)?;
        info!(
            "event=task_store_write module=store status=ok key={} mode={} count={}",
            self.key,
            mode.label(),
            tasks.len()
        );
        Ok(tasks)
    }
}

/// Decodes a persisted value defensively.
///
/// Invalid JSON or a non-array value yields `[]`. Array elements that are
/// not valid tasks are skipped. Later duplicates of an id are dropped.
/// Skipped elements are not carried along: the next write of the decoded
/// list removes them from storage.
pub fn decode_task_list(raw: &str) -> Vec<Task> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!("event=task_decode module=store status=error reason=invalid_json error={err}");
            return Vec::new();
        }
    };

    let Value::Array(items) = value else {
        warn!("event=task_decode module=store status=error reason=not_an_array");
        return Vec::new();
    };

    let mut tasks = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Task>(item) {
            Ok(task) => tasks.push(task),
            Err(err) => error!(
                "event=task_decode module=store status=skipped index={index} error={err}"
            ),
        }
    }
    dedupe_by_id(tasks)
}

fn dedupe_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let before = tasks.len();
    let unique: Vec<Task> = tasks
        .into_iter()
        .filter(|task| seen.insert(task.id.clone()))
        .collect();
    if unique.len() != before {
        warn!(
            "event=task_dedupe module=store status=ok dropped={}",
            before - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{decode_task_list, TaskStore, WriteMode};
    use crate::model::task::Task;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};
    use chrono::{TimeZone, Utc};

    fn task(id: &str) -> Task {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        Task::with_id(id, format!("task {id}"), created_at)
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn decode_rejects_non_arrays_and_invalid_json() {
        assert!(decode_task_list("not json").is_empty());
        assert!(decode_task_list(r#"{"id":"a"}"#).is_empty());
        assert!(decode_task_list("null").is_empty());
    }

    #[test]
    fn decode_skips_malformed_elements_and_duplicate_ids() {
        let raw = r#"[
            {"id":"a","title":"first","completed":false,"createdAt":"2024-06-01T00:00:00Z"},
            42,
            {"title":"no id"},
            {"id":"a","title":"dup","completed":true,"createdAt":"2024-06-01T00:00:00Z"},
            {"id":"b","title":"second","completed":true,"createdAt":"2024-06-01T00:00:00Z"}
        ]"#;
        let tasks = decode_task_list(raw);
        assert_eq!(ids(&tasks), vec!["a", "b"]);
        assert_eq!(tasks[0].title, "first");
    }

    #[test]
    fn undecodable_elements_are_dropped_by_the_next_replace() {
        let raw = r#"[
            {"id":"a","title":"kept","createdAt":"2024-06-01T00:00:00Z"},
            {"id":"b","title":"bad date","createdAt":"yesterday"}
        ]"#;
        let store = TaskStore::new(MemoryKeyValueStore::new().with_entry("TASKS", raw));

        let loaded = store.read_all();
        assert_eq!(ids(&loaded), vec!["a"]);
        store.write(loaded, WriteMode::Replace);

        let persisted = store.storage().get("TASKS").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&persisted).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["id"], "a");
    }

    #[test]
    fn append_single_task_goes_first() {
        let store = TaskStore::new(MemoryKeyValueStore::new());
        store.write(vec![task("a"), task("b")], WriteMode::Replace);

        let result = store.write(task("c"), WriteMode::Append);
        assert_eq!(ids(&result), vec!["c", "a", "b"]);
        assert_eq!(ids(&store.read_all()), vec!["c", "a", "b"]);
    }

    #[test]
    fn append_list_is_inserted_as_a_block() {
        let store = TaskStore::new(MemoryKeyValueStore::new());
        store.write(task("a"), WriteMode::Replace);

        let result = store.write(vec![task("x"), task("y")], WriteMode::Append);
        assert_eq!(ids(&result), vec!["x", "y", "a"]);
    }

    #[test]
    fn append_with_existing_id_replaces_old_entry() {
        let store = TaskStore::new(MemoryKeyValueStore::new());
        store.write(vec![task("a"), task("b")], WriteMode::Replace);

        let mut updated = task("b");
        updated.completed = true;
        let result = store.write(updated, WriteMode::Append);
        assert_eq!(ids(&result), vec!["b", "a"]);
        assert!(result[0].completed);
    }

    #[test]
    fn replace_single_task_normalizes_to_list() {
        let store = TaskStore::new(MemoryKeyValueStore::new());
        store.write(vec![task("a"), task("b")], WriteMode::Replace);

        let result = store.write(task("z"), WriteMode::Replace);
        assert_eq!(ids(&result), vec!["z"]);
        let raw = store.storage().get("TASKS").unwrap().unwrap();
        assert!(raw.starts_with('['));
    }

    #[test]
    fn append_over_malformed_data_starts_fresh() {
        let storage = MemoryKeyValueStore::new().with_entry("TASKS", "{broken");
        let store = TaskStore::new(storage);

        let result = store.write(task("a"), WriteMode::Append);
        assert_eq!(ids(&result), vec!["a"]);
    }

    #[test]
    fn legacy_key_is_read_and_migrated_on_write() {
        let legacy = serde_json::to_string(&vec![task("old")]).unwrap();
        let storage = MemoryKeyValueStore::new().with_entry("tasks", legacy);
        let store = TaskStore::new(storage);

        assert_eq!(ids(&store.read_all()), vec!["old"]);

        store.write(task("new"), WriteMode::Append);
        let canonical = store.storage().get("TASKS").unwrap().unwrap();
        assert_eq!(ids(&decode_task_list(&canonical)), vec!["new", "old"]);
    }
}
