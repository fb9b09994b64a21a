//! Alt text generation
//!
//! Uploads are validated before any provider sees them. Providers are
//! injectable: the OpenAI-compatible vision client when an API key is
//! configured, otherwise the seedable mock.

pub mod mock;
pub mod openai;
pub mod provider;
pub mod upload;

pub use mock::MockAltTextProvider;
pub use openai::OpenAiVisionClient;
pub use provider::{provider_from_config, AltTextProvider};
pub use upload::{ImageUpload, UploadLimits};
