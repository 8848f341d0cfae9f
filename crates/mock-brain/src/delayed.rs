//! Delayed generator - wraps another generator with artificial delay.

use std::time::Duration;

use netscript_core::{async_trait, GenerationError, GenerationRequest, TextGenerator};
use tokio::time::sleep;

/// A generator that wraps another generator and adds artificial delay.
///
/// Useful for exercising in-flight guards and stale-response fencing.
pub struct DelayedGenerator<G: TextGenerator> {
    inner: G,
    delay: Duration,
}

impl<G: TextGenerator> DelayedGenerator<G> {
    /// Create a new DelayedGenerator wrapping `inner` with the given delay.
    pub fn new(inner: G, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a generator with a delay in milliseconds.
    pub fn with_millis(inner: G, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for DelayedGenerator<G> {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        sleep(self.delay).await;
        self.inner.generate(request).await
    }

    fn name(&self) -> &str {
        "DelayedGenerator"
    }
}
