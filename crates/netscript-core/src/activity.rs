//! Activity log.
//!
//! Entries are written locally first (newest first, capped at
//! [`MAX_LOG_ENTRIES`]) and then handed to an optional [`LogSink`] for a
//! best-effort remote copy. The two writes are independent: a sink failure
//! never affects the local log and is never retried.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::RelayError;
use crate::identity::GitHubUser;
use crate::now_millis;
use crate::storage::{read_json, write_json, KeyValueStore};

/// Storage key for the local log.
pub const LOG_STORAGE_KEY: &str = "netscript_activity_logs";

/// Maximum number of entries kept locally.
pub const MAX_LOG_ENTRIES: usize = 200;

/// User label recorded when no identity is held.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Kind of user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogAction {
    Login,
    Logout,
    GenerateScript,
    DeepScanToggle,
    CloudSync,
    Error,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Login => "LOGIN",
            LogAction::Logout => "LOGOUT",
            LogAction::GenerateScript => "GENERATE_SCRIPT",
            LogAction::DeepScanToggle => "DEEP_SCAN_TOGGLE",
            LogAction::CloudSync => "CLOUD_SYNC",
            LogAction::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub action: LogAction,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl LogEntry {
    /// User label for display and export.
    pub fn user_label(&self) -> &str {
        self.user.as_deref().unwrap_or(ANONYMOUS_USER)
    }

    /// ISO-8601 UTC timestamp with milliseconds.
    pub fn iso_date(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp)
            .map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default()
    }

    /// Human-readable UTC date for reports.
    pub fn display_date(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp)
            .map(|date| date.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default()
    }
}

/// Remote destination for log entries.
///
/// `dispatch` must not block on delivery: implementations hand the entry
/// off and return. An `Err` only means the hand-off itself failed.
pub trait LogSink: Send + Sync {
    fn dispatch(&self, entry: &LogEntry) -> Result<(), RelayError>;
}

/// Local activity log with optional remote relay.
#[derive(Clone)]
pub struct ActivityLog {
    store: Arc<dyn KeyValueStore>,
    sink: Option<Arc<dyn LogSink>>,
    write_lock: Arc<Mutex<()>>,
}

impl ActivityLog {
    /// Local-only log.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            sink: None,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Log that also relays entries to `sink`.
    pub fn with_sink(store: Arc<dyn KeyValueStore>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink: Some(sink),
            ..Self::new(store)
        }
    }

    /// Record an action.
    pub fn record(
        &self,
        action: LogAction,
        details: impl Into<String>,
        user: Option<&GitHubUser>,
    ) -> LogEntry {
        let entry = LogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: now_millis(),
            action,
            details: details.into(),
            user: Some(
                user.map(|u| u.login.clone())
                    .unwrap_or_else(|| ANONYMOUS_USER.to_string()),
            ),
        };

        {
            let _lock = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
            let mut entries = self.entries();
            entries.insert(0, entry.clone());
            entries.truncate(MAX_LOG_ENTRIES);
            if let Err(err) = write_json(self.store.as_ref(), LOG_STORAGE_KEY, &entries) {
                error!(error = %err, "Failed to save log locally");
            }
        }

        debug!(action = %entry.action, user = entry.user_label(), "Recorded activity");

        if let Some(sink) = &self.sink {
            if let Err(err) = sink.dispatch(&entry) {
                warn!(error = %err, "Silent log report failed");
            }
        }

        entry
    }

    /// Local entries, newest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        match read_json(self.store.as_ref(), LOG_STORAGE_KEY) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "Failed to load local logs");
                Vec::new()
            }
        }
    }

    /// Drop every local entry.
    pub fn clear(&self) {
        let _lock = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(err) = self.store.remove(LOG_STORAGE_KEY) {
            error!(error = %err, "Failed to clear local logs");
        }
    }

    /// CSV export of the local log.
    pub fn to_csv(&self) -> String {
        entries_to_csv(&self.entries())
    }

    /// Pretty JSON export of the local log.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries())
    }
}

/// Download file name for an export made on `date`.
pub fn export_file_name(date: DateTime<Utc>, extension: &str) -> String {
    format!("netscript_logs_{}.{}", date.format("%Y-%m-%d"), extension)
}

/// Render entries as CSV.
pub fn entries_to_csv(entries: &[LogEntry]) -> String {
    let mut rows = Vec::with_capacity(entries.len() + 1);
    rows.push("Timestamp,Date,Action,User,Details,ID".to_string());

    for entry in entries {
        rows.push(format!(
            "{},{},{},{},{},{}",
            entry.timestamp,
            csv_quote(&entry.iso_date()),
            csv_quote(entry.action.as_str()),
            csv_quote(entry.user_label()),
            csv_quote(&entry.details),
            csv_quote(&entry.id),
        ));
    }

    rows.join("\n")
}

fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
