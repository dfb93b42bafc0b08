use async_trait::async_trait;
use mib_core::{Error, ModelInfo, Result, ValidatedImage, VisionModel};
use std::fmt;
use std::time::Duration;

const CANNED_ANALYSIS: &str = "## VISUAL ANALYSIS
Offline dummy model: no image analysis was performed.

## SEVERITY EVALUATION
ROUTINE

## IMPORTANT MEDICAL DISCLAIMER
This output is a placeholder and carries no medical meaning.";

/// Deterministic stand-in for a hosted model.
pub struct DummyModel {
    reply: std::result::Result<String, String>,
    delay: Option<Duration>,
}

impl DummyModel {
    /// Always answer with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            delay: None,
        }
    }

    /// Always fail with an upstream error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn respond(&self) -> Result<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone().map_err(Error::Upstream)
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new(CANNED_ANALYSIS)
    }
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("failing", &self.reply.is_err())
            .field("delay", &self.delay)
            .finish()
    }
}

#[async_trait]
impl VisionModel for DummyModel {
    fn info(&self) -> ModelInfo {
        ModelInfo::new("Dummy Vision Model", "Local")
    }

    async fn generate(&self, prompt: &str, image: &ValidatedImage) -> Result<String> {
        tracing::debug!(
            "Dummy generation for {:?} with a {} character prompt",
            image,
            prompt.len()
        );
        self.respond().await
    }

    async fn probe(&self, _prompt: &str) -> Result<String> {
        self.respond().await
    }
}
