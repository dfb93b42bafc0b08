use async_trait::async_trait;
use std::fmt;

use crate::upload::ValidatedImage;
use crate::types::ModelInfo;
use crate::Result;

#[async_trait]
pub trait VisionModel: Send + Sync + fmt::Debug {
    /// Describe the model for response envelopes and service endpoints
    fn info(&self) -> ModelInfo;

    /// Run one generation over a prompt and an image
    async fn generate(&self, prompt: &str, image: &ValidatedImage) -> Result<String>;

    /// Send a text-only prompt to check reachability and credentials
    async fn probe(&self, prompt: &str) -> Result<String>;
}
