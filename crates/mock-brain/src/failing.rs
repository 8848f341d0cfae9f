//! Failing generator - every call errors.

use netscript_core::{async_trait, GenerationError, GenerationRequest, TextGenerator};

/// What kind of failure to produce.
#[derive(Debug, Clone)]
enum Failure {
    Network(String),
    Provider { status: u16, message: String },
}

/// A generator that fails every request.
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    failure: Failure,
}

impl FailingGenerator {
    /// Fail as if the transport were down.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            failure: Failure::Network(message.into()),
        }
    }

    /// Fail as if the provider rejected the request.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self {
            failure: Failure::Provider {
                status,
                message: message.into(),
            },
        }
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        Err(match &self.failure {
            Failure::Network(message) => GenerationError::Network(message.clone()),
            Failure::Provider { status, message } => GenerationError::Provider {
                status: *status,
                message: message.clone(),
            },
        })
    }

    fn name(&self) -> &str {
        "FailingGenerator"
    }
}
