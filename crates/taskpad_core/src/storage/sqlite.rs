//! SQLite-backed key-value storage.

use super::{KeyValueStore, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value storage over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `StorageError::Unavailable` when `kv_entries` does not exist, i.e.
    ///   the connection was not opened through `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StorageError::Unavailable(
                "kv_entries table is missing; open the database with open_db".to_string(),
            ));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
