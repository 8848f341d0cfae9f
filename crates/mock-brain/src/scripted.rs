//! Scripted generator - replays queued responses.

use std::collections::VecDeque;
use std::sync::Mutex;

use netscript_core::{async_trait, GenerationError, GenerationRequest, TextGenerator};

/// A generator that answers from a queue and records every request.
///
/// When the queue runs dry it fails with `GenerationError::Unavailable`.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a generator answering with each text in order.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let generator = Self::new();
        for response in responses {
            generator.push_ok(response);
        }
        generator
    }

    /// Queue a successful response.
    pub fn push_ok(&self, text: impl Into<String>) {
        self.lock_responses().push_back(Ok(text.into()));
    }

    /// Queue a failure.
    pub fn push_err(&self, error: GenerationError) {
        self.lock_responses().push_back(Err(error));
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, GenerationError>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        self.lock_responses().pop_front().unwrap_or_else(|| {
            Err(GenerationError::Unavailable(
                "no scripted response left".to_string(),
            ))
        })
    }

    fn name(&self) -> &str {
        "ScriptedGenerator"
    }
}
