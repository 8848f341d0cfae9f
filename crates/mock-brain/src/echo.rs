//! Echo generator - returns the last user turn.

use netscript_core::{async_trait, GenerationError, GenerationRequest, TextGenerator};

/// A generator that echoes the most recent user turn.
///
/// Useful for exercising chat and pipeline flows without any model.
#[derive(Debug, Clone, Default)]
pub struct EchoGenerator {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoGenerator {
    /// Create a new EchoGenerator with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoGenerator with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_brain::EchoGenerator;
    ///
    /// let generator = EchoGenerator::with_prefix("Echo: ");
    /// // Will respond with "Echo: <last user turn>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let text = request.last_user_text().unwrap_or_default();

        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, text),
            None => text.to_string(),
        })
    }

    fn name(&self) -> &str {
        "EchoGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netscript_core::{ModelTier, Turn};

    #[tokio::test]
    async fn test_echo_no_prefix() {
        let generator = EchoGenerator::new();
        let request = GenerationRequest::prompt(ModelTier::Fast, "Hello!");

        assert_eq!(generator.generate(request).await.unwrap(), "Hello!");
    }

    #[tokio::test]
    async fn test_echo_with_prefix() {
        let generator = EchoGenerator::with_prefix("Echo: ");
        let request = GenerationRequest::prompt(ModelTier::Script, "Hello!");

        assert_eq!(generator.generate(request).await.unwrap(), "Echo: Hello!");
    }

    #[tokio::test]
    async fn test_echo_uses_last_user_turn() {
        let generator = EchoGenerator::new();
        let request = GenerationRequest::conversation(
            ModelTier::Fast,
            "system",
            vec![Turn::user("first"), Turn::model("reply"), Turn::user("second")],
        );

        assert_eq!(generator.generate(request).await.unwrap(), "second");
    }

    #[test]
    fn test_generator_name() {
        assert_eq!(EchoGenerator::new().name(), "EchoGenerator");
    }
}
