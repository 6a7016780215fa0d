//! In-process key-value storage for tests and throwaway sessions.

use super::{KeyValueStore, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Volatile map-backed storage. Not shared across threads.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing the write counter.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.borrow_mut().insert(key.into(), value.into());
        self
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
