//! Error types for AltTextBuddy
//!
//! One error enum covers the store, the upload checks and the outbound
//! API calls. HTTP status mapping lives in `server::error`.

use thiserror::Error;

/// Main error type for the AltTextBuddy service
#[derive(Error, Debug)]
pub enum AppError {
    /// Feedback file missing, corrupt or unwritable
    #[error("Storage error at {path}: {reason}")]
    StorageIo { path: String, reason: String },

    /// Request rejected before processing
    #[error("{0}")]
    Validation(String),

    /// Vision or fine-tuning API failure
    #[error("Upstream API error: {0}")]
    Upstream(String),

    /// Generation requested before a fine-tuning job succeeded
    #[error("No fine-tuned model available")]
    NoFineTunedModel,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Build a storage error tagged with the file it concerns
    pub fn storage(path: impl AsRef<std::path::Path>, reason: impl std::fmt::Display) -> Self {
        AppError::StorageIo {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the caller sent something we refused to process
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, AppError>;
