//! AltTextBuddy - Alt text generation service
//!
//! Generates alt text for uploaded images through a vision API (or a mock),
//! collects star-rated feedback on the results and turns that feedback into
//! fine-tuning data.
//!
//! # Architecture
//!
//! - **feedback**: append-only JSON file store
//! - **analytics**: summary statistics over the stored feedback
//! - **training**: JSONL export of training examples and the complete corpus
//! - **vision**: upload validation and alt text providers
//! - **finetune**: fine-tuning jobs and the shared fine-tuned model id
//! - **server**: axum HTTP API

pub mod errors;

// Re-export commonly used types
pub use errors::{AppError, Result};

// Core pipeline
pub mod feedback;
pub mod analytics;
pub mod training;

// External collaborators
pub mod vision;
pub mod finetune;

// Service surface
pub mod bootstrap;
pub mod cli;
pub mod server;
pub mod telemetry;
