//! GeminiClient implementation over the `generateContent` endpoint.

use async_trait::async_trait;
use netscript_core::{GenerationError, GenerationRequest, TextGenerator};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::config::GeminiConfig;

/// A [`TextGenerator`] backed by the Gemini REST API.
///
/// Each `generate` call is exactly one HTTP request; there is no retry.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new GeminiClient with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "Gemini API key is empty".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            GenerationError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!(
            "GeminiClient initialized with script model: {}, fast model: {}",
            config.script_model, config.fast_model
        );

        Ok(Self { client, config })
    }

    /// Create a GeminiClient from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn build_body(&self, request: GenerationRequest) -> GenerateContentRequest {
        let contents = request
            .turns
            .into_iter()
            .map(|turn| Content {
                role: Some(turn.role.as_str().to_string()),
                parts: vec![Part::text(turn.text)],
            })
            .collect();

        let system_instruction = request.system_instruction.map(|text| Content {
            role: None,
            parts: vec![Part::text(text)],
        });

        let generation_config = GenerationConfig {
            max_output_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        };

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let model = self.config.model_for(request.tier).to_string();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            model
        );
        let body = self.build_body(request);

        debug!(model = %model, turns = body.contents.len(), "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.message,
                Err(_) => error_text,
            };

            return Err(GenerationError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let completion: GenerateContentResponse = response.json().await.map_err(|e| {
            GenerationError::Malformed(format!("Failed to parse response: {}", e))
        })?;

        if let Some(usage) = &completion.usage_metadata {
            debug!(
                "Token usage - prompt: {}, candidates: {}, total: {}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }
        if let Some(reason) = completion
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!(finish_reason = reason, "Gemini response finished");
        }

        Ok(completion.text())
    }

    fn name(&self) -> &str {
        "GeminiClient"
    }
}
