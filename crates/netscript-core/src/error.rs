//! Error types for NetScript core operations.

use thiserror::Error;

/// Errors returned by a [`TextGenerator`](crate::TextGenerator).
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator is misconfigured (missing key, bad client setup).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The provider answered but the body could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The generator is temporarily unavailable.
    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the durable key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite failure (open, query, write).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored value is not valid JSON for the expected type.
    #[error("corrupt value under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store rejected the write (quota, read-only, injected failure).
    #[error("write rejected: {0}")]
    WriteRejected(String),

    /// The store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors from a chat send that are reported to the caller.
///
/// Provider failures are not errors here: they are appended to the
/// transcript as a model-authored message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    /// The session could not be created and is disabled.
    #[error("chat is unavailable")]
    Disabled,

    /// Another message is still waiting for its reply.
    #[error("a message is already being sent")]
    Busy,

    /// Blank input.
    #[error("message is empty")]
    EmptyMessage,
}

/// Errors from dispatching a log entry to a remote sink.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Entry could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// No async runtime is available to carry the request.
    #[error("no async runtime available")]
    NoRuntime,

    /// The sink refused the entry before sending.
    #[error("relay failed: {0}")]
    Failed(String),
}
