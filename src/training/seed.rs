//! Hand-authored seed examples included in every complete corpus

use std::path::Path;

use crate::errors::{AppError, Result};
use crate::training::types::TrainingExample;

/// System turn for seed and corpus examples
pub const CORPUS_SYSTEM_PROMPT: &str = "Generate concise, descriptive alt text for web accessibility. \
Focus on the main subject, important details, and context that would help someone who cannot see \
the image understand what it shows. Keep it under 125 characters when possible.";

const SEED_PAIRS: [(&str, &str); 5] = [
    (
        "Generate alt text for an image showing a person working on a laptop in a modern office space with large windows and plants",
        "Person typing on laptop at desk in bright modern office with large windows and green plants",
    ),
    (
        "Generate alt text for an image of a golden retriever dog sitting in a park on grass with trees in background",
        "Golden retriever dog sitting on green grass in park with trees in background",
    ),
    (
        "Generate alt text for a screenshot of a website dashboard showing analytics charts and graphs",
        "Website dashboard interface displaying multiple analytics charts and performance graphs",
    ),
    (
        "Generate alt text for a photo of fresh vegetables arranged on a wooden cutting board in a kitchen",
        "Fresh vegetables including tomatoes, carrots, and lettuce arranged on wooden cutting board",
    ),
    (
        "Generate alt text for an image showing a student reading a book in a library with bookshelves",
        "Student reading book while sitting at table in library surrounded by tall bookshelves",
    ),
];

/// Built-in seed table
pub fn default_seed_examples() -> Vec<TrainingExample> {
    SEED_PAIRS
        .iter()
        .map(|(request, reply)| TrainingExample::new(CORPUS_SYSTEM_PROMPT, *request, *reply))
        .collect()
}

/// Seeds from a JSONL file, or the built-in table when no file is configured
pub fn load_seed_examples(path: Option<&Path>) -> Result<Vec<TrainingExample>> {
    let Some(path) = path else {
        return Ok(default_seed_examples());
    };

    let raw = std::fs::read_to_string(path).map_err(|e| AppError::storage(path, e))?;
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).map_err(|e| {
                AppError::Config(format!("{}:{}: invalid seed example: {}", path.display(), n + 1, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::types::{to_jsonl, Role};
    use tempfile::TempDir;

    #[test]
    fn test_default_seeds() {
        let seeds = default_seed_examples();
        assert_eq!(seeds.len(), 5);
        assert!(seeds.iter().all(|s| s.turn(Role::System) == Some(CORPUS_SYSTEM_PROMPT)));
        assert!(seeds.iter().all(|s| s.messages.len() == 3));
    }

    #[test]
    fn test_no_file_uses_defaults() {
        assert_eq!(load_seed_examples(None).unwrap(), default_seed_examples());
    }

    #[test]
    fn test_load_from_jsonl() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("seeds.jsonl");
        let seeds = vec![TrainingExample::new("s", "u1", "a1"), TrainingExample::new("s", "u2", "a2")];
        std::fs::write(&path, format!("{}\n\n", to_jsonl(&seeds).unwrap())).unwrap();

        assert_eq!(load_seed_examples(Some(&path)).unwrap(), seeds);
    }

    #[test]
    fn test_bad_line_reports_position() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("seeds.jsonl");
        std::fs::write(&path, "{\"messages\":[]}\nnope").unwrap();

        let err = load_seed_examples(Some(&path)).unwrap_err();
        assert!(err.to_string().contains(":2:"));
    }
}
