//! GitHub identity verification.
//!
//! Exchanges a personal access token for the token owner's public profile.
//! The token is held as a [`SecretString`] for the duration of one request
//! and is never stored.
//!
//! # Example
//!
//! ```no_run
//! use github_identity::{GitHubClient, IdentityConfig, SecretString};
//!
//! # async fn example() -> Result<(), github_identity::IdentityError> {
//! let client = GitHubClient::new(IdentityConfig::default())?;
//! let user = client.verify(SecretString::from("ghp_example")).await?;
//! println!("Signed in as {}", user.login);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::GitHubClient;
pub use config::IdentityConfig;
pub use error::IdentityError;
pub use netscript_core::GitHubUser;
pub use secrecy::SecretString;
