//! Image upload validation

use bytes::Bytes;

use crate::cli::config::DEFAULT_MAX_IMAGE_BYTES;
use crate::errors::{AppError, Result};

/// Upload acceptance rules
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    /// Inclusive size cap in bytes
    pub max_bytes: usize,
}

impl UploadLimits {
    /// Rejection for anything over the cap
    pub fn too_large(&self) -> AppError {
        AppError::Validation(format!(
            "File too large. Maximum size is {}MB.",
            self.max_bytes / (1024 * 1024)
        ))
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// An accepted image, ready for a provider
#[derive(Debug, Clone)]
pub struct ImageUpload {
    mime_type: String,
    data: Bytes,
}

impl ImageUpload {
    /// Check MIME type and size; nothing else is inspected
    pub fn validate(mime_type: &str, data: Bytes, limits: UploadLimits) -> Result<Self> {
        if !mime_type.starts_with("image/") {
            return Err(AppError::Validation("Only image files are allowed!".to_string()));
        }

        if data.len() > limits.max_bytes {
            return Err(limits.too_large());
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inline `data:` URL carrying the base64 image
    pub fn data_url(&self) -> String {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}
