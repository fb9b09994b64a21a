//! Fine-tuning API client
//!
//! Endpoints used:
//! - POST /files (multipart, purpose=fine-tune)
//! - POST /fine_tuning/jobs
//! - GET /fine_tuning/jobs/{id}
//! - POST /chat/completions

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::errors::{AppError, Result};
use crate::vision::openai::{first_choice_text, read_completion, ChatCompletionRequest};

/// Uploads can be large; allow 5 minutes
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Fine-tuning job as reported by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineTuneJob {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub fine_tuned_model: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub finished_at: Option<i64>,
}

/// Operations the fine-tuning workflow needs from the hosted API
#[async_trait]
pub trait FineTuneApi: Send + Sync {
    /// Upload JSONL training data, returning the file id
    async fn upload_training_file(&self, jsonl: String) -> Result<String>;

    async fn create_job(&self, training_file: &str, base_model: &str, n_epochs: u32) -> Result<FineTuneJob>;

    async fn retrieve_job(&self, job_id: &str) -> Result<FineTuneJob>;

    /// Single chat completion against `model`
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String>;
}

/// HTTP implementation against an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiFineTuneClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    id: String,
}

impl OpenAiFineTuneClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Upstream(format!("{} failed: HTTP {}: {}", what, status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("{} returned unreadable body: {}", what, e)))
    }
}

#[async_trait]
impl FineTuneApi for OpenAiFineTuneClient {
    async fn upload_training_file(&self, jsonl: String) -> Result<String> {
        let part = Part::bytes(jsonl.into_bytes())
            .file_name("training-examples.jsonl")
            .mime_str("application/jsonl")?;
        let form = Form::new().text("purpose", "fine-tune").part("file", part);

        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to upload training file: {}", e)))?;

        let file: UploadedFile = Self::decode(response, "file upload").await?;
        Ok(file.id)
    }

    async fn create_job(&self, training_file: &str, base_model: &str, n_epochs: u32) -> Result<FineTuneJob> {
        let response = self
            .client
            .post(format!("{}/fine_tuning/jobs", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "training_file": training_file,
                "model": base_model,
                "hyperparameters": { "n_epochs": n_epochs }
            }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to create fine-tuning job: {}", e)))?;

        Self::decode(response, "job creation").await
    }

    async fn retrieve_job(&self, job_id: &str) -> Result<FineTuneJob> {
        let response = self
            .client
            .get(format!("{}/fine_tuning/jobs/{}", self.base_url, job_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to retrieve job {}: {}", job_id, e)))?;

        Self::decode(response, "job lookup").await
    }

    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                json!({ "role": "system", "content": system }),
                json!({ "role": "user", "content": user }),
            ],
            max_tokens: 100,
            temperature: Some(0.3),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send request: {}", e)))?;

        first_choice_text(read_completion(response).await?)
    }
}
