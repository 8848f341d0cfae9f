//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use netscript_core::prompt::DEFAULT_EXPLAIN_PREFIX_CHARS;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite file holding history, activity and identity.
    pub db_path: PathBuf,
    /// Characters of a script sent for explanation.
    pub explain_prefix_chars: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `NETSCRIPT_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `NETSCRIPT_DB_PATH` | SQLite database file | `netscript.db` |
    /// | `NETSCRIPT_EXPLAIN_PREFIX_CHARS` | Script prefix sent for explanation | `3000` |
    ///
    /// The Gemini, GitHub and relay crates read their own variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("NETSCRIPT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let db_path = env::var("NETSCRIPT_DB_PATH")
            .unwrap_or_else(|_| "netscript.db".to_string())
            .into();

        let explain_prefix_chars = match env::var("NETSCRIPT_EXPLAIN_PREFIX_CHARS") {
            Ok(raw) => raw
                .parse()
                .ok()
                .filter(|chars: &usize| *chars > 0)
                .ok_or(ConfigError::InvalidExplainPrefix)?,
            Err(_) => DEFAULT_EXPLAIN_PREFIX_CHARS,
        };

        Ok(Self {
            addr,
            db_path,
            explain_prefix_chars,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid NETSCRIPT_ADDR format")]
    InvalidAddr,

    #[error("NETSCRIPT_EXPLAIN_PREFIX_CHARS must be a positive integer")]
    InvalidExplainPrefix,
}
