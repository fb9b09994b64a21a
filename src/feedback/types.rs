//! Feedback record types
//!
//! `FeedbackSubmission` is the loosely-typed request body, `FeedbackInput`
//! the validated form handed to the store, and `FeedbackRecord` what the
//! store writes back out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, Result};

/// Raw feedback body as sent by the browser
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub generated_alt_text: Option<String>,
    #[serde(default)]
    pub user_improvement: Option<String>,
    /// Number or numeric string
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub image_type: Option<String>,
    /// Any JSON value, coerced by truthiness
    #[serde(default)]
    pub helpful: Option<Value>,
}

/// Validated feedback, not yet stamped by the store
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackInput {
    pub generated_alt_text: Option<String>,
    pub user_improvement: Option<String>,
    pub rating: i32,
    pub image_type: Option<String>,
    pub helpful: bool,
}

/// One stored judgment of one generated alt text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_improvement: Option<String>,
    pub rating: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(default)]
    pub helpful: bool,
    pub timestamp: DateTime<Utc>,
    pub id: String,
}

impl FeedbackSubmission {
    /// Validate the submission. Only a missing or non-numeric rating is
    /// rejected; out-of-range ratings pass through unchanged.
    pub fn into_input(self) -> Result<FeedbackInput> {
        let rating = self
            .rating
            .as_ref()
            .and_then(parse_rating)
            .ok_or_else(|| AppError::Validation("Rating must be an integer".to_string()))?;

        Ok(FeedbackInput {
            generated_alt_text: self.generated_alt_text,
            user_improvement: self.user_improvement.filter(|s| !s.is_empty()),
            rating,
            image_type: self.image_type.filter(|s| !s.is_empty()),
            helpful: self.helpful.as_ref().map(is_truthy).unwrap_or(false),
        })
    }
}

impl FeedbackInput {
    /// Shorthand used by tests and the CLI
    pub fn rated(rating: i32) -> Self {
        Self {
            generated_alt_text: None,
            user_improvement: None,
            rating,
            image_type: None,
            helpful: rating >= 4,
        }
    }

    pub fn with_alt_text(mut self, text: impl Into<String>) -> Self {
        self.generated_alt_text = Some(text.into());
        self
    }

    pub fn with_improvement(mut self, text: impl Into<String>) -> Self {
        self.user_improvement = Some(text.into());
        self
    }

    pub fn with_image_type(mut self, mime: impl Into<String>) -> Self {
        self.image_type = Some(mime.into());
        self
    }

    /// Stamp the input with store-assigned fields
    pub fn into_record(self, id: String, timestamp: DateTime<Utc>) -> FeedbackRecord {
        FeedbackRecord {
            generated_alt_text: self.generated_alt_text,
            user_improvement: self.user_improvement,
            rating: self.rating,
            image_type: self.image_type,
            helpful: self.helpful,
            timestamp,
            id,
        }
    }
}

impl FeedbackRecord {
    /// Improvement text, treating an empty string as absent
    pub fn improvement(&self) -> Option<&str> {
        self.user_improvement.as_deref().filter(|s| !s.is_empty())
    }

    /// Text the user saw
    pub fn alt_text(&self) -> &str {
        self.generated_alt_text.as_deref().unwrap_or("")
    }
}

/// Integer rating from a JSON number or a string with a leading integer
fn parse_rating(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Leading optional sign plus digits, ignoring whatever follows ("4 stars" -> 4)
fn parse_leading_int(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i32>().ok().map(|v| sign * v)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
