//! Feedback-to-training-example export
//!
//! Keeps records rated 4+ or carrying an improvement, maps each to the fixed
//! three-turn layout and writes the JSONL payload over any previous export.

use std::path::Path;
use tracing::info;

use crate::errors::{AppError, Result};
use crate::feedback::FeedbackRecord;
use crate::training::types::{to_jsonl, TrainingExample};

/// System turn for feedback-derived examples
pub const FEEDBACK_SYSTEM_PROMPT: &str =
    "Generate concise, descriptive alt text for web accessibility. Focus on the most important visual elements.";

/// Used in the user turn when the record has no MIME type
pub const DEFAULT_IMAGE_TYPE: &str = "general image";

/// Result of one export run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExport {
    pub examples: Vec<TrainingExample>,
    pub payload: String,
}

impl TrainingExport {
    pub fn count(&self) -> usize {
        self.examples.len()
    }

    /// Persist the payload, replacing any earlier export
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(parent, e))?;
        }
        tokio::fs::write(path, &self.payload)
            .await
            .map_err(|e| AppError::storage(path, e))?;
        info!(path = %path.display(), count = self.count(), "training export written");
        Ok(())
    }
}

/// Whether a record is good enough to train on
pub fn is_training_candidate(record: &FeedbackRecord) -> bool {
    record.rating >= 4 || record.improvement().is_some()
}

/// Map one record to its training example
pub fn to_training_example(record: &FeedbackRecord) -> TrainingExample {
    let image_type = record
        .image_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_IMAGE_TYPE);
    let reply = record.improvement().unwrap_or_else(|| record.alt_text());

    TrainingExample::new(
        FEEDBACK_SYSTEM_PROMPT,
        format!("Generate alt text for this image type: {}", image_type),
        reply,
    )
}

/// Filter, map and serialize the records
pub fn export_training_data(records: &[FeedbackRecord]) -> Result<TrainingExport> {
    let examples: Vec<TrainingExample> = records
        .iter()
        .filter(|r| is_training_candidate(r))
        .map(to_training_example)
        .collect();
    let payload = to_jsonl(&examples)?;

    Ok(TrainingExport { examples, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackInput;
    use crate::training::types::Role;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(input: FeedbackInput) -> FeedbackRecord {
        input.into_record("1".to_string(), Utc::now())
    }

    #[test]
    fn test_high_rating_uses_generated_text() {
        let export = export_training_data(&[record(FeedbackInput::rated(5).with_alt_text("A cat"))]).unwrap();
        assert_eq!(export.count(), 1);
        assert_eq!(export.examples[0].turn(Role::Assistant), Some("A cat"));
    }

    #[test]
    fn test_low_rating_needs_improvement() {
        let without = record(FeedbackInput::rated(2).with_alt_text("A cat"));
        let with = record(
            FeedbackInput::rated(2)
                .with_alt_text("A cat")
                .with_improvement("A fluffy gray cat"),
        );

        assert_eq!(export_training_data(&[without]).unwrap().count(), 0);

        let export = export_training_data(&[with]).unwrap();
        assert_eq!(export.examples[0].turn(Role::Assistant), Some("A fluffy gray cat"));
    }

    #[test]
    fn test_image_type_in_user_turn() {
        let typed = to_training_example(&record(FeedbackInput::rated(5).with_image_type("image/png")));
        let untyped = to_training_example(&record(FeedbackInput::rated(5)));

        assert_eq!(
            typed.turn(Role::User),
            Some("Generate alt text for this image type: image/png")
        );
        assert_eq!(
            untyped.turn(Role::User),
            Some("Generate alt text for this image type: general image")
        );
        assert_eq!(untyped.turn(Role::System), Some(FEEDBACK_SYSTEM_PROMPT));
    }

    #[test]
    fn test_missing_text_exports_empty_reply() {
        let example = to_training_example(&record(FeedbackInput::rated(4)));
        assert_eq!(example.turn(Role::Assistant), Some(""));
    }

    #[test]
    fn test_empty_export_is_valid() {
        let export = export_training_data(&[]).unwrap();
        assert_eq!(export.count(), 0);
        assert_eq!(export.payload, "");
    }

    #[test]
    fn test_payload_is_deterministic() {
        let records = vec![
            record(FeedbackInput::rated(5).with_alt_text("A cat")),
            record(FeedbackInput::rated(1).with_improvement("A dog")),
            record(FeedbackInput::rated(3)),
        ];
        let first = export_training_data(&records).unwrap();
        let second = export_training_data(&records).unwrap();
        assert_eq!(first.payload, second.payload);
        assert_eq!(first.payload.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_export() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("training-data-from-feedback.jsonl");
        std::fs::write(&path, "stale\nstale\nstale").unwrap();

        let export = export_training_data(&[record(FeedbackInput::rated(5).with_alt_text("A cat"))]).unwrap();
        export.write_to(&path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), export.payload);
    }
}
