//! Configuration management for AltTextBuddy
//!
//! Provides TOML-based configuration with defaults, environment overrides
//! and validation.
//! Location: ~/.alttextbuddy/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::errors::{AppError, Result};

/// Maximum accepted image upload (5 MB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Complete configuration for AltTextBuddy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub vision: VisionConfig,
    pub training: TrainingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whole-request body cap; must exceed the image cap so oversized
    /// uploads reach the handler and get a 400 instead of a 413.
    pub max_body_bytes: usize,
}

/// Feedback file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub feedback_file: PathBuf,
    pub feedback_export_file: PathBuf,
}

/// Vision API and mock provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Mock provider is used when unset
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub max_image_bytes: usize,
    pub mock_delay_ms: u64,
    pub mock_seed: Option<u64>,
}

/// Training corpus and fine-tuning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub corpus_file: PathBuf,
    /// JSONL file replacing the built-in seed examples
    pub seed_file: Option<PathBuf>,
    pub base_model: String,
    pub n_epochs: u32,
    pub min_examples: usize,
    pub write_corpus: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            feedback_file: PathBuf::from("feedback-data.json"),
            feedback_export_file: PathBuf::from("training-data-from-feedback.jsonl"),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4-vision-preview".to_string(),
            max_tokens: 150,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            mock_delay_ms: 1500,
            mock_seed: None,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            corpus_file: PathBuf::from("training-examples.jsonl"),
            seed_file: None,
            base_model: "gpt-4o-mini".to_string(),
            n_epochs: 3,
            min_examples: 10,
            write_corpus: true,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults, then apply environment
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(config_path) = path {
            Self::load_from_file(&config_path)?
        } else {
            Self::load_default()?
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load default configuration, creating the file on first run
    pub fn load_default() -> Result<Self> {
        let Some(config_path) = Self::default_path() else {
            return Ok(Config::default());
        };

        if config_path.exists() {
            return Self::load_from_file(&config_path);
        }

        let config = Config::default();
        // A read-only home is not fatal; defaults still apply.
        if let Err(e) = config.save(&config_path) {
            tracing::warn!(path = %config_path.display(), error = %e, "could not write default config");
        }
        Ok(config)
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".alttextbuddy").join("config.toml"))
    }

    /// Overlay environment variables onto the loaded values
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.vision.api_key = Some(key);
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(file) = lookup("ALTTEXT_FEEDBACK_FILE") {
            self.storage.feedback_file = PathBuf::from(file);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.vision.max_image_bytes == 0 {
            return Err(AppError::Config(
                "max_image_bytes must be greater than 0".to_string()
            ));
        }

        if self.server.max_body_bytes <= self.vision.max_image_bytes {
            return Err(AppError::Config(
                "max_body_bytes must exceed max_image_bytes".to_string()
            ));
        }

        if self.training.n_epochs == 0 {
            return Err(AppError::Config(
                "n_epochs must be greater than 0".to_string()
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AppError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Whether a real vision API key is configured
    pub fn has_openai(&self) -> bool {
        self.vision.api_key.is_some()
    }

    /// Listen address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.vision.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(config.storage.feedback_file, PathBuf::from("feedback-data.json"));
        assert!(!config.has_openai());
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_body_limit_must_exceed_image_limit() {
        let mut config = Config::default();
        config.server.max_body_bytes = config.vision.max_image_bytes;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_epochs_rejected() {
        let mut config = Config::default();
        config.training.n_epochs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "8080"),
            ("ALTTEXT_FEEDBACK_FILE", "/var/lib/alt/feedback.json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.vision.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.feedback_file, PathBuf::from("/var/lib/alt/feedback.json"));
        assert!(config.has_openai());
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let mut config = Config::default();
        config.apply_env(|k| (k == "OPENAI_API_KEY").then(|| "  ".to_string()));
        assert!(!config.has_openai());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4000\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.training.min_examples, 10);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.training.base_model = "gpt-4o-mini-2024".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.training.base_model, "gpt-4o-mini-2024");
    }
}
