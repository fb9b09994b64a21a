//! Alt text provider abstraction

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::config::VisionConfig;
use crate::errors::Result;
use crate::vision::mock::MockAltTextProvider;
use crate::vision::openai::OpenAiVisionClient;
use crate::vision::upload::ImageUpload;

/// Source of alt text for an accepted image
#[async_trait]
pub trait AltTextProvider: Send + Sync {
    async fn generate(&self, image: &ImageUpload) -> Result<String>;

    /// Short label for logs and the health endpoint
    fn name(&self) -> &'static str;
}

/// Real client when an API key is configured, mock otherwise
pub fn provider_from_config(config: &VisionConfig) -> Result<Arc<dyn AltTextProvider>> {
    match &config.api_key {
        Some(key) => Ok(Arc::new(OpenAiVisionClient::with_config(
            &config.base_url,
            key,
            &config.model,
            config.max_tokens,
        )?)),
        None => {
            let delay = Duration::from_millis(config.mock_delay_ms);
            let mock = match config.mock_seed {
                Some(seed) => MockAltTextProvider::seeded(seed, delay),
                None => MockAltTextProvider::new(delay),
            };
            Ok(Arc::new(mock))
        }
    }
}
