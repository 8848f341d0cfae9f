//! Configuration for the GitHub client.

use std::env;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default User-Agent header. GitHub rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = "netscript-web";

/// Configuration for talking to the GitHub API.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Base URL of the REST API.
    pub api_url: String,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl IdentityConfig {
    /// Create a configuration pointing at the given API base URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Read `GITHUB_API_URL` and `GITHUB_USER_AGENT`, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            user_agent: env::var("GITHUB_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// Get the authenticated-user endpoint URL.
    pub fn user_url(&self) -> String {
        format!("{}/user", self.api_url.trim_end_matches('/'))
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
