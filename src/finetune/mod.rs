//! Fine-tuning workflow
//!
//! Builds the complete corpus, uploads it to the fine-tuning API, polls job
//! status and, once a job succeeds, generates with the resulting model.

pub mod cell;
pub mod client;
pub mod manager;

pub use cell::FineTunedModelCell;
pub use client::{FineTuneApi, FineTuneJob, OpenAiFineTuneClient};
pub use manager::{FineTuneJobSummary, FineTuneStatus, FineTuningManager};
