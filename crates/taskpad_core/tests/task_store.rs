use chrono::{NaiveDate, TimeZone, Utc};
use taskpad_core::db::{open_db, open_db_in_memory};
use taskpad_core::{
    KeyValueStore, Priority, SqliteKeyValueStore, StorageError, StorageResult, StoreError, Task,
    TaskStore, WriteMode,
};

fn task(id: &str) -> Task {
    let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    Task::with_id(id, format!("task {id}"), created_at)
}

fn ids(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.id.as_str()).collect()
}

/// Storage that fails every call.
struct BrokenStorage;

impl KeyValueStore for BrokenStorage {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("disk ejected".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk ejected".to_string()))
    }
}

/// Storage whose reads work but writes fail.
struct ReadOnlyStorage(String);

impl KeyValueStore for ReadOnlyStorage {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(Some(self.0.clone()))
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("read-only volume".to_string()))
    }
}

#[test]
fn replace_then_read_roundtrips_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = TaskStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let mut detailed = task("a");
    detailed.description = Some("with notes".to_string());
    detailed.priority = Priority::High;
    detailed.due_date = NaiveDate::from_ymd_opt(2024, 6, 12);
    detailed.completed = true;
    let list = vec![detailed, task("b"), task("c")];

    store.write(list.clone(), WriteMode::Replace);
    assert_eq!(store.read_all(), list);
}

#[test]
fn append_after_replace_puts_new_task_first() {
    let conn = open_db_in_memory().unwrap();
    let store = TaskStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let existing = vec![task("a"), task("b"), task("c")];
    store.write(existing.clone(), WriteMode::Replace);
    let result = store.write(task("new"), WriteMode::Append);

    assert_eq!(result[0].id, "new");
    assert_eq!(&result[1..], existing.as_slice());
    assert_eq!(store.read_all(), result);
}

#[test]
fn data_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    {
        let conn = open_db(&path).unwrap();
        let store = TaskStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());
        store.write(vec![task("a"), task("b")], WriteMode::Replace);
    }

    let conn = open_db(&path).unwrap();
    let store = TaskStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    assert_eq!(ids(&store.read_all()), vec!["a", "b"]);
}

#[test]
fn persisted_value_is_a_json_array_of_camel_case_tasks() {
    let conn = open_db_in_memory().unwrap();
    let store = TaskStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let mut due = task("a");
    due.due_date = NaiveDate::from_ymd_opt(2024, 6, 20);
    store.write(due, WriteMode::Replace);

    let raw: String = conn
        .query_row("SELECT value FROM kv_entries WHERE key = 'TASKS';", [], |row| row.get(0))
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &json.as_array().unwrap()[0];
    assert_eq!(first["id"], "a");
    assert_eq!(first["dueDate"], "2024-06-20");
    assert_eq!(first["priority"], "Low");
    assert_eq!(first["completed"], false);
}

#[test]
fn storage_failures_degrade_to_empty_results() {
    let store = TaskStore::new(BrokenStorage);

    assert!(store.read_all().is_empty());
    assert!(store.write(task("a"), WriteMode::Replace).is_empty());
    assert!(store.write(task("a"), WriteMode::Append).is_empty());
    assert!(matches!(store.try_read_all(), Err(StoreError::Storage(_))));
}

#[test]
fn write_failure_returns_empty_but_reads_still_work() {
    let raw = serde_json::to_string(&vec![task("kept")]).unwrap();
    let store = TaskStore::new(ReadOnlyStorage(raw));

    assert!(store.write(task("lost"), WriteMode::Append).is_empty());
    assert_eq!(ids(&store.read_all()), vec!["kept"]);
}

#[test]
fn malformed_values_read_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKeyValueStore::try_new(&conn).unwrap();

    for raw in ["", "{not json", "\"a string\"", "{\"tasks\":[]}", "17"] {
        storage.set("TASKS", raw).unwrap();
        let store = TaskStore::new(&storage);
        assert!(store.read_all().is_empty(), "raw value {raw:?}");
        assert!(store.try_read_all().unwrap().is_empty());
    }
}
