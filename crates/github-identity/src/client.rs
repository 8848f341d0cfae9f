//! GitHub REST client.

use std::time::Duration;

use netscript_core::GitHubUser;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::config::IdentityConfig;
use crate::error::IdentityError;

/// Client for verifying GitHub tokens.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    config: IdentityConfig,
}

impl GitHubClient {
    /// Create a client. No request is made until [`verify`](Self::verify).
    pub fn new(config: IdentityConfig) -> Result<Self, IdentityError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| IdentityError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Exchange a token for the owner's profile.
    ///
    /// Exactly one request is made. 401 maps to
    /// [`IdentityError::InvalidToken`]; any other non-success status maps to
    /// [`IdentityError::Api`].
    pub async fn verify(&self, token: SecretString) -> Result<GitHubUser, IdentityError> {
        let token = token.expose_secret().trim();
        if token.is_empty() {
            return Err(IdentityError::EmptyToken);
        }

        let url = self.config.user_url();
        debug!("Verifying GitHub token: {}", url);

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("token {}", token))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("GitHub rejected the token");
            return Err(IdentityError::InvalidToken);
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "GitHub API returned an error");
            return Err(IdentityError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let user: GitHubUser = serde_json::from_str(&body)?;
        info!("Verified GitHub user {}", user.login);

        Ok(user)
    }
}
