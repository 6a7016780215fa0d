//! Device key-value storage contract and implementations.
//!
//! # Responsibility
//! - Model the platform key-value store as a small `get`/`set` trait.
//! - Keep backend details (SQLite, in-process map) out of the task store.
//!
//! # Invariants
//! - `set` replaces the whole value for a key atomically.
//! - A value written by `set` is returned by the next `get` for that key.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by a storage backend.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Backend cannot serve requests (missing schema, closed handle, ...).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value storage with single-key atomic writes.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}
