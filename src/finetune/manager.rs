//! Fine-tuning manager
//!
//! Coordinates corpus building, job creation, status polling and
//! generation with the fine-tuned model.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::config::TrainingConfig;
use crate::errors::{AppError, Result};
use crate::feedback::FeedbackStore;
use crate::finetune::cell::FineTunedModelCell;
use crate::finetune::client::FineTuneApi;
use crate::training::seed::CORPUS_SYSTEM_PROMPT;
use crate::training::{build_complete_corpus, CorpusReport, TrainingExample};

/// Outcome of starting a fine-tuning job
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FineTuneJobSummary {
    pub job_id: String,
    pub status: String,
    pub training_examples: usize,
}

/// Job status as reported back to admins
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FineTuneStatus {
    pub status: String,
    pub model: Option<String>,
    pub created_at: Option<i64>,
    pub finished_at: Option<i64>,
}

/// Fine-tuning workflow over the feedback store
pub struct FineTuningManager {
    api: Option<Arc<dyn FineTuneApi>>,
    store: Arc<FeedbackStore>,
    seeds: Vec<TrainingExample>,
    model_cell: FineTunedModelCell,
    config: TrainingConfig,
}

impl FineTuningManager {
    /// `api` is `None` when no API key is configured
    pub fn new(
        api: Option<Arc<dyn FineTuneApi>>,
        store: Arc<FeedbackStore>,
        seeds: Vec<TrainingExample>,
        config: TrainingConfig,
    ) -> Self {
        Self {
            api,
            store,
            seeds,
            model_cell: FineTunedModelCell::new(),
            config,
        }
    }

    /// Shared model id slot
    pub fn model_cell(&self) -> &FineTunedModelCell {
        &self.model_cell
    }

    /// Build the seed + feedback corpus and write it unless disabled
    pub async fn generate_complete_training_data(&self) -> Result<CorpusReport> {
        let records = match self.store.read_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "feedback store unreadable, corpus built from seeds only");
                Vec::new()
            }
        };

        let report = build_complete_corpus(&records, &self.seeds)?;

        if self.config.write_corpus {
            let path = &self.config.corpus_file;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::storage(parent, e))?;
            }
            tokio::fs::write(path, &report.payload)
                .await
                .map_err(|e| AppError::storage(path, e))?;
        }

        info!(
            total = report.total_examples,
            seeds = report.base_examples,
            feedback = report.feedback_examples,
            "complete training corpus built"
        );
        Ok(report)
    }

    /// Upload the corpus and start a fine-tuning job
    pub async fn create_fine_tuned_model(&self) -> Result<FineTuneJobSummary> {
        let api = self.require_api()?;
        let report = self.generate_complete_training_data().await?;

        if report.total_examples < self.config.min_examples {
            return Err(AppError::Validation(format!(
                "Need at least {} training examples. Current: {}",
                self.config.min_examples, report.total_examples
            )));
        }

        let file_id = api.upload_training_file(report.payload.clone()).await?;
        info!(file_id = %file_id, "training file uploaded");

        let job = api
            .create_job(&file_id, &self.config.base_model, self.config.n_epochs)
            .await?;
        info!(job_id = %job.id, status = %job.status, "fine-tuning job created");

        Ok(FineTuneJobSummary {
            job_id: job.id,
            status: job.status,
            training_examples: report.total_examples,
        })
    }

    /// Poll a job; a succeeded job installs its model as the current one
    pub async fn check_fine_tuning_status(&self, job_id: &str) -> Result<FineTuneStatus> {
        if !is_valid_job_id(job_id) {
            return Err(AppError::Validation("Invalid fine-tuning job id".to_string()));
        }
        let job = self.require_api()?.retrieve_job(job_id).await?;

        if job.status == "succeeded" {
            if let Some(model) = &job.fine_tuned_model {
                self.model_cell.set(model.clone()).await;
                info!(model = %model, "fine-tuning completed");
            }
        }

        Ok(FineTuneStatus {
            status: job.status,
            model: job.fine_tuned_model,
            created_at: job.created_at,
            finished_at: job.finished_at,
        })
    }

    /// Generate alt text from a textual description with the fine-tuned model
    pub async fn generate_with_fine_tuned_model(&self, image_description: &str) -> Result<String> {
        let model = self.model_cell.get().await.ok_or(AppError::NoFineTunedModel)?;
        self.require_api()?
            .complete(&model, CORPUS_SYSTEM_PROMPT, image_description)
            .await
    }

    fn require_api(&self) -> Result<&Arc<dyn FineTuneApi>> {
        self.api
            .as_ref()
            .ok_or_else(|| AppError::Validation("OpenAI API key required for fine-tuning".to_string()))
    }
}

/// Job ids are interpolated into the upstream URL path
fn is_valid_job_id(job_id: &str) -> bool {
    !job_id.is_empty()
        && job_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
