//! Webhook relay for activity logs.
//!
//! This crate provides a [`LogSink`] that copies each activity entry to a
//! remote webhook. Delivery is fire-and-forget: the POST runs on a spawned
//! task, the response is never inspected and failures are only logged.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use activity_relay::WebhookRelay;
//! use netscript_core::{ActivityLog, MemoryStore};
//!
//! # fn example() -> Result<(), activity_relay::Error> {
//! let relay = WebhookRelay::new("https://hooks.example/log")?;
//! let log = ActivityLog::with_sink(Arc::new(MemoryStore::new()), Arc::new(relay));
//! # Ok(())
//! # }
//! ```

use std::env;
use std::time::Duration;

use netscript_core::{LogEntry, LogSink, RelayError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Content type the webhook expects. Plain text keeps browser-origin
/// callers out of CORS preflight.
pub const RELAY_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// Errors that can occur while building a relay.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Relay configuration.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Webhook URL. `None` disables the relay.
    pub webhook_url: Option<String>,
}

impl RelayConfig {
    /// Read `NETSCRIPT_LOG_WEBHOOK_URL`. Unset or blank disables the relay.
    pub fn from_env() -> Self {
        Self {
            webhook_url: env::var("NETSCRIPT_LOG_WEBHOOK_URL")
                .ok()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        }
    }

    /// Build the relay if one is configured.
    pub fn into_relay(self) -> Result<Option<WebhookRelay>, Error> {
        self.webhook_url.map(WebhookRelay::new).transpose()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    log_entry: RelayedEntry<'a>,
}

#[derive(Serialize)]
struct RelayedEntry<'a> {
    id: &'a str,
    timestamp: i64,
    action: &'a str,
    user: &'a str,
    details: &'a str,
}

/// Encode an entry the way the webhook receives it.
pub fn encode_entry(entry: &LogEntry) -> Result<String, RelayError> {
    let envelope = Envelope {
        log_entry: RelayedEntry {
            id: &entry.id,
            timestamp: entry.timestamp,
            action: entry.action.as_str(),
            user: entry.user_label(),
            details: &entry.details,
        },
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// A [`LogSink`] that POSTs entries to a webhook.
#[derive(Clone)]
pub struct WebhookRelay {
    http: Client,
    url: String,
}

impl WebhookRelay {
    /// Create a relay for the given webhook URL.
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!("webhook URL must be http(s): {}", url)));
        }

        let http = Client::builder().timeout(Duration::from_secs(15)).build()?;
        info!("Activity relay enabled");

        Ok(Self { http, url })
    }

    /// Get the webhook URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LogSink for WebhookRelay {
    fn dispatch(&self, entry: &LogEntry) -> Result<(), RelayError> {
        let body = encode_entry(entry)?;
        let handle = Handle::try_current().map_err(|_| RelayError::NoRuntime)?;

        let http = self.http.clone();
        let url = self.url.clone();
        let action = entry.action;
        handle.spawn(async move {
            match http
                .post(&url)
                .header(CONTENT_TYPE, RELAY_CONTENT_TYPE)
                .body(body)
                .send()
                .await
            {
                Ok(_) => debug!(action = %action, "Relayed activity entry"),
                Err(e) => warn!(action = %action, error = %e, "Activity relay failed"),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netscript_core::LogAction;

    fn entry() -> LogEntry {
        LogEntry {
            id: "abc".to_string(),
            timestamp: 1_700_000_000_000,
            action: LogAction::GenerateScript,
            details: "Targets: WiFi=true, BLE=false, Online=false, Deep=false".to_string(),
            user: None,
        }
    }

    #[test]
    fn test_encode_entry_envelope() {
        let json: serde_json::Value = serde_json::from_str(&encode_entry(&entry()).unwrap()).unwrap();

        assert_eq!(json["logEntry"]["id"], "abc");
        assert_eq!(json["logEntry"]["timestamp"], 1_700_000_000_000i64);
        assert_eq!(json["logEntry"]["action"], "GENERATE_SCRIPT");
        assert_eq!(json["logEntry"]["user"], "anonymous");
        assert!(json["logEntry"]["details"]
            .as_str()
            .unwrap()
            .starts_with("Targets:"));
    }

    #[test]
    fn test_dispatch_without_runtime() {
        let relay = WebhookRelay::new("http://127.0.0.1:9/log").unwrap();
        assert!(matches!(relay.dispatch(&entry()), Err(RelayError::NoRuntime)));
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(matches!(WebhookRelay::new("ftp://x"), Err(Error::Config(_))));
    }

    #[test]
    fn test_config_without_url_builds_nothing() {
        let relay = RelayConfig::default().into_relay().unwrap();
        assert!(relay.is_none());
    }
}
