//! Feedback analytics
//!
//! Summary statistics over the full stored feedback history.

pub mod summary;

pub use summary::{summarize, summarize_store, AnalyticsSummary, RECENT_FEEDBACK_LIMIT};
