// Feedback summary statistics
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::feedback::{FeedbackRecord, FeedbackStore};

/// Number of records reported in `recent_feedback`
pub const RECENT_FEEDBACK_LIMIT: usize = 10;

/// Aggregate view of every stored feedback record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Number of records
    pub total_feedback: usize,
    /// Mean rating over all records, 0 when there are none
    pub average_rating: f64,
    /// Count per star value 1..=5; other values are not counted
    pub rating_distribution: BTreeMap<u8, usize>,
    /// Every improvement text in store order
    pub common_improvements: Vec<String>,
    /// Most recent records, newest first
    pub recent_feedback: Vec<FeedbackRecord>,
}

impl Default for AnalyticsSummary {
    fn default() -> Self {
        summarize(&[])
    }
}

/// Compute the summary for a record sequence
pub fn summarize(records: &[FeedbackRecord]) -> AnalyticsSummary {
    let total_feedback = records.len();

    let average_rating = if total_feedback == 0 {
        0.0
    } else {
        let sum: i64 = records.iter().map(|r| i64::from(r.rating)).sum();
        sum as f64 / total_feedback as f64
    };

    let mut rating_distribution: BTreeMap<u8, usize> = (1..=5).map(|star| (star, 0)).collect();
    for record in records {
        if let Ok(star) = u8::try_from(record.rating) {
            if let Some(count) = rating_distribution.get_mut(&star) {
                *count += 1;
            }
        }
    }

    let common_improvements = records
        .iter()
        .filter_map(|r| r.improvement().map(str::to_string))
        .collect();

    let recent_feedback = records
        .iter()
        .rev()
        .take(RECENT_FEEDBACK_LIMIT)
        .cloned()
        .collect();

    AnalyticsSummary {
        total_feedback,
        average_rating,
        rating_distribution,
        common_improvements,
        recent_feedback,
    }
}

/// Summarize the store, degrading an unreadable store to the empty summary
pub async fn summarize_store(store: &FeedbackStore) -> AnalyticsSummary {
    match store.read_all().await {
        Ok(records) => summarize(&records),
        Err(e) => {
            warn!(error = %e, "feedback store unreadable, reporting empty analytics");
            summarize(&[])
        }
    }
}
