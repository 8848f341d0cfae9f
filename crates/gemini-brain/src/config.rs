//! Configuration for GeminiClient.

use netscript_core::{GenerationError, ModelTier};
use std::env;
use std::time::Duration;

/// Default Gemini API base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for script generation.
pub const DEFAULT_SCRIPT_MODEL: &str = "gemini-3-pro-preview";

/// Default model for explanations and chat.
pub const DEFAULT_FAST_MODEL: &str = "gemini-2.5-flash";

/// Configuration for GeminiClient.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Gemini API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model used for [`ModelTier::Script`].
    pub script_model: String,

    /// Model used for [`ModelTier::Fast`].
    pub fast_model: String,

    /// Maximum output tokens per response.
    pub max_output_tokens: Option<u32>,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Whole-request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            script_model: DEFAULT_SCRIPT_MODEL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            max_output_tokens: None,
            temperature: None,
            timeout: None,
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY` (or `API_KEY`) - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_SCRIPT_MODEL` - Script model (default: gemini-3-pro-preview)
    /// - `GEMINI_FAST_MODEL` - Explanation and chat model (default: gemini-2.5-flash)
    /// - `GEMINI_MAX_OUTPUT_TOKENS` - Max output tokens (default: provider default)
    /// - `GEMINI_TEMPERATURE` - Temperature (default: provider default)
    /// - `GEMINI_TIMEOUT_SECS` - Request timeout in seconds (default: none)
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::Configuration("GEMINI_API_KEY not set".to_string()))?;

        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let script_model =
            env::var("GEMINI_SCRIPT_MODEL").unwrap_or_else(|_| DEFAULT_SCRIPT_MODEL.to_string());

        let fast_model =
            env::var("GEMINI_FAST_MODEL").unwrap_or_else(|_| DEFAULT_FAST_MODEL.to_string());

        let max_output_tokens = env::var("GEMINI_MAX_OUTPUT_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok());

        let temperature = env::var("GEMINI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok());

        let timeout = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_url,
            api_key,
            script_model,
            fast_model,
            max_output_tokens,
            temperature,
            timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }

    /// Concrete model identifier for a tier.
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Script => &self.script_model,
            ModelTier::Fast => &self.fast_model,
        }
    }
}

/// Builder for GeminiConfig.
#[derive(Debug, Default)]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the script model.
    pub fn script_model(mut self, model: impl Into<String>) -> Self {
        self.config.script_model = model.into();
        self
    }

    /// Set the fast model.
    pub fn fast_model(mut self, model: impl Into<String>) -> Self {
        self.config.fast_model = model.into();
        self
    }

    /// Set the max output tokens.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiConfig {
        self.config
    }
}
