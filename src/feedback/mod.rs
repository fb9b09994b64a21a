//! Feedback collection
//!
//! User judgments of generated alt text, persisted to a single JSON file.

pub mod store;
pub mod types;

pub use store::FeedbackStore;
pub use types::{FeedbackInput, FeedbackRecord, FeedbackSubmission};
