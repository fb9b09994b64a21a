//! Complete fine-tuning corpus
//!
//! Seed examples followed by examples built from the recent feedback window
//! where the user both rated 4+ and supplied an improvement.

use serde::Serialize;

use crate::analytics::summarize;
use crate::errors::Result;
use crate::feedback::FeedbackRecord;
use crate::training::seed::CORPUS_SYSTEM_PROMPT;
use crate::training::types::{to_jsonl, TrainingExample};

/// Counts and payload of one corpus build
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusReport {
    pub total_examples: usize,
    pub base_examples: usize,
    pub feedback_examples: usize,
    #[serde(skip)]
    pub payload: String,
}

fn improvement_example(record: &FeedbackRecord) -> Option<TrainingExample> {
    if record.rating < 4 {
        return None;
    }
    let improvement = record.improvement()?;
    Some(TrainingExample::new(
        CORPUS_SYSTEM_PROMPT,
        format!("Improve this alt text: \"{}\"", record.alt_text()),
        improvement,
    ))
}

/// Merge seeds with qualifying recent feedback
pub fn build_complete_corpus(
    records: &[FeedbackRecord],
    seeds: &[TrainingExample],
) -> Result<CorpusReport> {
    let recent = summarize(records).recent_feedback;
    let feedback: Vec<TrainingExample> = recent.iter().filter_map(improvement_example).collect();

    let mut all = Vec::with_capacity(seeds.len() + feedback.len());
    all.extend_from_slice(seeds);
    all.extend(feedback.iter().cloned());

    Ok(CorpusReport {
        total_examples: all.len(),
        base_examples: seeds.len(),
        feedback_examples: feedback.len(),
        payload: to_jsonl(&all)?,
    })
}
