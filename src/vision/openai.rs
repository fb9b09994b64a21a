//! OpenAI-compatible vision client
//!
//! Sends one chat completion request carrying the image as an inline
//! `data:` URL and returns the trimmed reply.
//! Endpoint: POST {base_url}/chat/completions

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

use crate::errors::{AppError, Result};
use crate::vision::provider::AltTextProvider;
use crate::vision::upload::ImageUpload;

/// Instruction sent alongside every image
pub const ALT_TEXT_INSTRUCTION: &str = "Generate a concise, descriptive alt text for this image. \
Focus on the main subject, important details, and context that would help someone who cannot see \
the image understand what it shows. Keep it under 125 characters when possible.";

/// Request timeout (60 seconds)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Vision API client
#[derive(Debug, Clone)]
pub struct OpenAiVisionClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiVisionClient {
    /// Create client with custom configuration
    pub fn with_config(base_url: &str, api_key: &str, model: &str, max_tokens: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
        })
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body(&self, image: &ImageUpload) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": ALT_TEXT_INSTRUCTION },
                    { "type": "image_url", "image_url": { "url": image.data_url() } }
                ]
            })],
            max_tokens: self.max_tokens,
            temperature: None,
        }
    }
}

#[async_trait]
impl AltTextProvider for OpenAiVisionClient {
    async fn generate(&self, image: &ImageUpload) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, bytes = image.len(), mime = image.mime_type(), "requesting alt text");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(image))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send request: {}", e)))?;

        let completion = read_completion(response).await.map_err(|e| {
            error!(error = %e, "vision API call failed");
            e
        })?;
        first_choice_text(completion)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<serde_json::Value>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Decode a completion, turning non-2xx statuses into upstream errors
pub(crate) async fn read_completion(response: reqwest::Response) -> Result<ChatCompletionResponse> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AppError::Upstream(format!("HTTP {}: {}", status, error_text)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to parse completion: {}", e)))
}

/// Trimmed text of the first choice
pub(crate) fn first_choice_text(completion: ChatCompletionResponse) -> Result<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| AppError::Upstream("Completion contained no choices".to_string()))
}
