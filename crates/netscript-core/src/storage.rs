//! Durable key-value storage.
//!
//! Each persisted structure lives as one JSON document under a fixed key.
//! [`SqliteStore`] is the durable backend; [`MemoryStore`] backs tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::StorageError;

/// A synchronous string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON document.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a JSON document.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// SQLite-backed store with a single `kv` table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (and create if needed) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Opened key-value store");
        Self::init(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, crate::now_millis()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// In-memory store. Writes can be made to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteRejected("quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("k", "one").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("one"));

        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.remove("k").unwrap();
    }

    #[test]
    fn test_sqlite_store_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        exercise(&store);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        exercise(&store);
    }

    #[test]
    fn test_memory_store_write_failure() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        store.set_fail_writes(true);

        assert!(matches!(
            store.set("k", "other"),
            Err(StorageError::WriteRejected(_))
        ));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_read_json_corrupt() {
        let store = MemoryStore::new();
        store.set("doc", "{not json").unwrap();

        let result: Result<Option<Vec<String>>, _> = read_json(&store, "doc");
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_sqlite_store_persists_across_connections() {
        let dir = std::env::temp_dir().join(format!("netscript-kv-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("store.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            write_json(&store, "list", &vec!["a", "b"]).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let list: Option<Vec<String>> = read_json(&store, "list").unwrap();
        assert_eq!(list, Some(vec!["a".to_string(), "b".to_string()]));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
