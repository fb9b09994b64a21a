//! Bootstrap for AltTextBuddy
//!
//! Wires configuration into a ready store, alt text provider and
//! fine-tuning manager.

use std::sync::Arc;
use tracing::info;

use crate::cli::config::Config;
use crate::errors::Result;
use crate::feedback::FeedbackStore;
use crate::finetune::{FineTuneApi, FineTuningManager, OpenAiFineTuneClient};
use crate::server::AppState;
use crate::training::load_seed_examples;
use crate::vision::{provider_from_config, AltTextProvider, UploadLimits};

/// Initialized service components
pub struct Bootstrap {
    pub config: Config,
    pub store: Arc<FeedbackStore>,
    pub provider: Arc<dyn AltTextProvider>,
    pub fine_tuning: Arc<FineTuningManager>,
}

impl Bootstrap {
    /// Initialize the store and build providers from config
    pub async fn new(config: Config) -> Result<Self> {
        let store = Arc::new(FeedbackStore::new(config.storage.feedback_file.clone()));
        store.initialize().await?;

        let provider = provider_from_config(&config.vision)?;
        info!(
            provider = provider.name(),
            "alt text provider ready ({})",
            if config.has_openai() { "OpenAI integration enabled" } else { "using mock responses" }
        );

        let fine_tune_api: Option<Arc<dyn FineTuneApi>> = match &config.vision.api_key {
            Some(key) => Some(Arc::new(OpenAiFineTuneClient::new(&config.vision.base_url, key)?)),
            None => None,
        };
        let seeds = load_seed_examples(config.training.seed_file.as_deref())?;
        let fine_tuning = Arc::new(FineTuningManager::new(
            fine_tune_api,
            store.clone(),
            seeds,
            config.training.clone(),
        ));

        Ok(Self {
            config,
            store,
            provider,
            fine_tuning,
        })
    }

    /// Handler state for the HTTP router
    pub fn app_state(&self) -> AppState {
        AppState {
            store: self.store.clone(),
            provider: self.provider.clone(),
            fine_tuning: self.fine_tuning.clone(),
            upload_limits: UploadLimits {
                max_bytes: self.config.vision.max_image_bytes,
            },
            export_path: self.config.storage.feedback_export_file.clone(),
            has_openai: self.config.has_openai(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.feedback_file = temp.path().join("data").join("feedback.json");
        config.storage.feedback_export_file = temp.path().join("export.jsonl");
        config.vision.mock_delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_bootstrap_initializes_store() {
        let temp = TempDir::new().unwrap();
        let boot = Bootstrap::new(test_config(&temp)).await.unwrap();

        assert!(boot.store.path().exists());
        assert_eq!(boot.provider.name(), "mock");

        let state = boot.app_state();
        assert!(!state.has_openai);
        assert_eq!(state.upload_limits.max_bytes, 5 * 1024 * 1024);
        assert_eq!(state.export_path, temp.path().join("export.jsonl"));
    }

    #[tokio::test]
    async fn test_missing_seed_file_fails() {
        let temp = TempDir::new().unwrap();
        let mut config = test_config(&temp);
        config.training.seed_file = Some(temp.path().join("missing.jsonl"));

        assert!(Bootstrap::new(config).await.is_err());
    }
}
