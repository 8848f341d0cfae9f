//! Script generation and explanation over a [`TextGenerator`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ScriptConfig;
use crate::generator::{GenerationRequest, ModelTier, TextGenerator};
use crate::prompt::{build_explain_prompt, build_script_prompt, hash_prompt, DEFAULT_EXPLAIN_PREFIX_CHARS};

/// Placeholder when the model answers with no text.
pub const NO_CODE_GENERATED: &str = "# Error: No code generated.";

/// Prefix of the marked error string returned in place of code.
pub const GENERATION_ERROR_PREFIX: &str = "# Error generating script: ";

/// Explanation placeholder when the model answers with no text.
pub const NO_EXPLANATION: &str = "No explanation available.";

/// Explanation returned when the explanation call fails.
pub const EXPLANATION_FAILED: &str = "Failed to generate explanation.";

/// Result of one generation call.
///
/// `code` is always displayable. On failure it holds a clearly marked error
/// string and `failure` carries the reason for the caller to surface and log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptGeneration {
    pub code: String,
    pub failure: Option<String>,
}

impl ScriptGeneration {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of a full Generate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub generation: ScriptGeneration,
    /// `None` when generation failed and no explanation was requested.
    pub explanation: Option<String>,
}

/// Generation and explanation pipeline.
#[derive(Clone)]
pub struct ScriptPipeline {
    generator: Arc<dyn TextGenerator>,
    explain_prefix_chars: usize,
}

impl ScriptPipeline {
    /// Create a pipeline over a generator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            explain_prefix_chars: DEFAULT_EXPLAIN_PREFIX_CHARS,
        }
    }

    /// Set how many characters of a script are sent for explanation.
    pub fn with_explain_prefix_chars(mut self, chars: usize) -> Self {
        self.explain_prefix_chars = chars;
        self
    }

    /// The underlying generator.
    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// Generate a script for the configuration.
    ///
    /// Never fails: provider errors are folded into a marked error string.
    pub async fn generate_script(&self, config: &ScriptConfig) -> ScriptGeneration {
        let prompt = build_script_prompt(config);
        info!(
            generator = self.generator.name(),
            fingerprint = %hash_prompt(&prompt),
            "Requesting script generation"
        );

        match self
            .generator
            .generate(GenerationRequest::prompt(ModelTier::Script, prompt))
            .await
        {
            Ok(text) => {
                let code = strip_code_fences(&text);
                debug!(chars = code.len(), "Script generated");
                ScriptGeneration {
                    code: if code.is_empty() {
                        NO_CODE_GENERATED.to_string()
                    } else {
                        code
                    },
                    failure: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "Script generation failed");
                let reason = err.to_string();
                ScriptGeneration {
                    code: format!("{}{}", GENERATION_ERROR_PREFIX, reason),
                    failure: Some(reason),
                }
            }
        }
    }

    /// Ask for a natural-language explanation of a script.
    pub async fn explain_script(&self, code: &str) -> String {
        let prompt = build_explain_prompt(code, self.explain_prefix_chars);

        match self
            .generator
            .generate(GenerationRequest::prompt(ModelTier::Fast, prompt))
            .await
        {
            Ok(text) if text.trim().is_empty() => NO_EXPLANATION.to_string(),
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Script explanation failed");
                EXPLANATION_FAILED.to_string()
            }
        }
    }

    /// Generate, then explain only if generation succeeded.
    pub async fn run(&self, config: &ScriptConfig) -> PipelineOutcome {
        let generation = self.generate_script(config).await;
        let explanation = if generation.is_success() {
            Some(self.explain_script(&generation.code).await)
        } else {
            None
        };

        PipelineOutcome {
            generation,
            explanation,
        }
    }
}

/// Remove markdown code fences from model output.
///
/// Fence lines (` ``` ` with or without a language tag) are dropped, any
/// stray inline fences are removed, and the result is trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let kept: Vec<&str> = text.lines().filter(|line| !is_fence_line(line)).collect();
    kept.join("\n").replace("```", "").trim().to_string()
}

fn is_fence_line(line: &str) -> bool {
    match line.trim().strip_prefix("```") {
        Some(tag) => tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_' | '.')),
        None => false,
    }
}
