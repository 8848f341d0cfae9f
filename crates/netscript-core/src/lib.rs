//! Core types and services for NetScript.
//!
//! This crate holds everything that does not talk HTTP directly:
//!
//! - [`ScriptConfig`] - The scan options collected by the form
//! - [`prompt`] - Pure prompt construction from a configuration
//! - [`TextGenerator`] - The seam implemented by hosted model clients
//! - [`ScriptPipeline`] / [`ChatSession`] - Generation, explanation and chat flows
//! - [`HistoryStore`] / [`ActivityLog`] / [`IdentityStore`] - Persisted state
//!   over a [`KeyValueStore`]
//! - [`gate`] - Identity-gated feature toggles
//! - [`RequestFence`] - Stale response detection for overlapping requests
//!
//! # Example
//!
//! ```rust
//! use netscript_core::{prompt::build_script_prompt, ScriptConfig};
//!
//! let config = ScriptConfig::default();
//! let prompt = build_script_prompt(&config);
//! assert!(prompt.contains("Scan WiFi/LAN: true"));
//! ```

pub mod activity;
pub mod chat;
pub mod config;
pub mod error;
pub mod fence;
pub mod gate;
pub mod generator;
pub mod history;
pub mod identity;
pub mod pipeline;
pub mod prompt;
pub mod storage;

pub use activity::{ActivityLog, LogAction, LogEntry, LogSink, MAX_LOG_ENTRIES};
pub use chat::{ChatMessage, ChatSession};
pub use config::{OsTarget, ScriptConfig};
pub use error::{ChatError, GenerationError, RelayError, StorageError};
pub use fence::{RequestFence, RequestToken};
pub use gate::{GateDecision, GatedFeature};
pub use generator::{GenerationRequest, ModelTier, Role, TextGenerator, Turn};
pub use history::{HistoryStore, SavedScript, MAX_SAVED_SCRIPTS};
pub use identity::{GitHubUser, IdentityStore};
pub use pipeline::{strip_code_fences, PipelineOutcome, ScriptGeneration, ScriptPipeline};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};

// Re-export async_trait for implementors of TextGenerator
pub use async_trait::async_trait;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
