//! Error types for github-identity.

use thiserror::Error;

/// Errors that can occur when verifying a token.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// GitHub rejected the token (401).
    #[error("Invalid Token. Please check and try again.")]
    InvalidToken,

    /// GitHub answered with another non-success status.
    #[error("GitHub API Error ({status})")]
    Api { status: u16 },

    /// The request never got a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The profile body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The token was blank.
    #[error("Token is empty")]
    EmptyToken,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl IdentityError {
    /// Message suitable for showing next to the login form.
    pub fn user_message(&self) -> &'static str {
        match self {
            IdentityError::InvalidToken => "Invalid Token. Please check and try again.",
            IdentityError::Api { .. } | IdentityError::Json(_) => "GitHub API Error",
            IdentityError::Http(_) => "Could not reach GitHub. Check your connection and try again.",
            IdentityError::EmptyToken => "Please enter a token.",
            IdentityError::Config(_) => "Sign-in is not configured.",
        }
    }
}
