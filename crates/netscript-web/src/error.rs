//! Error types for the web workbench.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum WebError {
    /// Requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            WebError::Json(err) => {
                tracing::error!("JSON error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, WebError>;
