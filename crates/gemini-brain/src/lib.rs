//! Google Gemini text generator.
//!
//! This crate provides a [`TextGenerator`] that calls the Gemini
//! `generateContent` REST endpoint. Script generation goes to the large
//! model, explanations and chat go to the fast model.
//!
//! # Usage
//!
//! ```rust,no_run
//! use gemini_brain::GeminiClient;
//! use netscript_core::{GenerationRequest, ModelTier, TextGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::from_env()?;
//!     let text = client
//!         .generate(GenerationRequest::prompt(ModelTier::Fast, "Explain ARP"))
//!         .await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiConfigBuilder};

// Re-export core types for convenience
pub use netscript_core::{GenerationError, GenerationRequest, ModelTier, TextGenerator, Turn};
