//! Mock text generators for NetScript.
//!
//! This crate provides mock implementations of the `TextGenerator` trait:
//! - `EchoGenerator` - Echoes the last user turn back
//! - `ScriptedGenerator` - Replays queued responses and records requests
//! - `FailingGenerator` - Fails every call with a chosen error
//! - `DelayedGenerator` - Wraps another generator with artificial delay
//!
//! For real completions, use the `gemini-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{EchoGenerator, GenerationRequest, ModelTier, TextGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::GenerationError> {
//!     let generator = EchoGenerator::new();
//!
//!     let request = GenerationRequest::prompt(ModelTier::Fast, "Hello!");
//!     let text = generator.generate(request).await?;
//!     assert_eq!(text, "Hello!");
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;
mod scripted;

// Re-export core types for convenience
pub use netscript_core::{
    async_trait, GenerationError, GenerationRequest, ModelTier, Role, TextGenerator, Turn,
};

pub use delayed::DelayedGenerator;
pub use echo::EchoGenerator;
pub use failing::FailingGenerator;
pub use scripted::ScriptedGenerator;
