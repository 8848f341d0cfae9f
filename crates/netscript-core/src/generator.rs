//! The text generator seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Author of a turn in a conversation with a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// Which class of model a request should go to.
///
/// Generators map tiers onto concrete model identifiers, so callers never
/// hard-code provider model names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Large model used for script generation.
    Script,
    /// Fast model used for explanations and chat.
    Fast,
}

/// A single turn sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// A request for one text completion.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub tier: ModelTier,
    pub system_instruction: Option<String>,
    pub turns: Vec<Turn>,
}

impl GenerationRequest {
    /// Single-prompt request with no system instruction.
    pub fn prompt(tier: ModelTier, prompt: impl Into<String>) -> Self {
        Self {
            tier,
            system_instruction: None,
            turns: vec![Turn::user(prompt)],
        }
    }

    /// Conversation request with a system instruction.
    pub fn conversation(
        tier: ModelTier,
        system_instruction: impl Into<String>,
        turns: Vec<Turn>,
    ) -> Self {
        Self {
            tier,
            system_instruction: Some(system_instruction.into()),
            turns,
        }
    }

    /// Text of the last user turn, if any.
    pub fn last_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.text.as_str())
    }
}

/// A hosted text-generation endpoint.
///
/// Implementations make exactly one outbound call per `generate` and do not
/// retry. This trait is object-safe and is shared as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce raw text for the request. An empty string is a valid answer.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}
