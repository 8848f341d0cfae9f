//! Saved script history.
//!
//! Entries are kept newest first under a single key and capped at
//! [`MAX_SAVED_SCRIPTS`]. Storage failures are logged and never reach the
//! caller; unreadable history reads as empty.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::ScriptConfig;
use crate::now_millis;
use crate::storage::{read_json, write_json, KeyValueStore};

/// Storage key for the saved script list.
pub const HISTORY_STORAGE_KEY: &str = "netscript_saved_history";

/// Maximum number of saved scripts kept.
pub const MAX_SAVED_SCRIPTS: usize = 50;

/// A persisted snapshot of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedScript {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub code: String,
    pub explanation: String,
    pub config: ScriptConfig,
}

/// Saved script history over a key-value store.
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Arc<Mutex<()>>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Save a script and return the new entry.
    pub fn save(&self, code: &str, explanation: &str, config: &ScriptConfig) -> SavedScript {
        let entry = SavedScript {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: now_millis(),
            code: code.to_string(),
            explanation: explanation.to_string(),
            config: config.clone(),
        };

        let _lock = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut history = self.list();
        history.insert(0, entry.clone());
        history.truncate(MAX_SAVED_SCRIPTS);

        match write_json(self.store.as_ref(), HISTORY_STORAGE_KEY, &history) {
            Ok(()) => info!(id = %entry.id, entries = history.len(), "Saved script to history"),
            Err(err) => error!(error = %err, "Failed to save script history"),
        }

        entry
    }

    /// All saved scripts, newest first.
    pub fn list(&self) -> Vec<SavedScript> {
        match read_json(self.store.as_ref(), HISTORY_STORAGE_KEY) {
            Ok(history) => history.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "Failed to load history");
                Vec::new()
            }
        }
    }

    /// Look up one saved script.
    pub fn get(&self, id: &str) -> Option<SavedScript> {
        self.list().into_iter().find(|script| script.id == id)
    }

    /// Delete a saved script and return the remaining entries.
    ///
    /// An unknown id leaves the history untouched.
    pub fn delete(&self, id: &str) -> Vec<SavedScript> {
        let _lock = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut history = self.list();
        let before = history.len();
        history.retain(|script| script.id != id);

        if history.len() == before {
            return history;
        }

        if let Err(err) = write_json(self.store.as_ref(), HISTORY_STORAGE_KEY, &history) {
            error!(error = %err, id = %id, "Failed to delete script");
        }
        history
    }

    /// Remove every saved script.
    pub fn clear(&self) {
        let _lock = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(err) = self.store.remove(HISTORY_STORAGE_KEY) {
            error!(error = %err, "Failed to clear history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SqliteStore};

    fn history() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_save_prepends() {
        let history = history();
        let config = ScriptConfig::default();

        let first = history.save("print(1)", "one", &config);
        let second = history.save("print(2)", "two", &config);

        let list = history.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_cap_keeps_most_recent() {
        let history = history();
        let config = ScriptConfig::default();

        for i in 0..51 {
            history.save(&format!("script {}", i), "", &config);
        }

        let list = history.list();
        assert_eq!(list.len(), MAX_SAVED_SCRIPTS);
        assert_eq!(list[0].code, "script 50");
        assert_eq!(list[49].code, "script 1");
        assert!(list.iter().all(|s| s.code != "script 0"));
        assert!(list.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn test_delete_keeps_order() {
        let history = history();
        let config = ScriptConfig::default();

        let a = history.save("a", "", &config);
        let b = history.save("b", "", &config);
        let c = history.save("c", "", &config);

        let remaining = history.delete(&b.id);
        let ids: Vec<_> = remaining.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![c.id.clone(), a.id.clone()]);
        assert_eq!(history.list(), remaining);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let history = history();
        let config = ScriptConfig::default();
        history.save("a", "", &config);
        history.save("b", "", &config);

        let before = history.list();
        let after = history.delete("does-not-exist");
        assert_eq!(before, after);
    }

    #[test]
    fn test_get_by_id() {
        let history = history();
        let saved = history.save("code", "explained", &ScriptConfig::default());

        assert_eq!(history.get(&saved.id), Some(saved));
        assert_eq!(history.get("missing"), None);
    }

    #[test]
    fn test_save_survives_write_failure() {
        let store = Arc::new(MemoryStore::new());
        let history = HistoryStore::new(store.clone());
        store.set_fail_writes(true);

        let saved = history.save("code", "", &ScriptConfig::default());
        assert_eq!(saved.code, "code");
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_corrupt_history_reads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_STORAGE_KEY, "[{\"id\":").unwrap();
        let history = HistoryStore::new(store);

        assert!(history.list().is_empty());
        let saved = history.save("fresh", "", &ScriptConfig::default());
        assert_eq!(history.list(), vec![saved]);
    }

    #[test]
    fn test_clear() {
        let history = HistoryStore::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        history.save("a", "", &ScriptConfig::default());

        history.clear();
        assert!(history.list().is_empty());
    }
}
