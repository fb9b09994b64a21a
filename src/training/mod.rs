//! Training data export
//!
//! Turns stored feedback into chat-format fine-tuning examples:
//! - `exporter`: quality-filtered examples from the whole store
//! - `corpus`: seed examples merged with recent improved feedback
//! - `seed`: the built-in hand-authored seed table

pub mod corpus;
pub mod exporter;
pub mod seed;
pub mod types;

pub use corpus::{build_complete_corpus, CorpusReport};
pub use exporter::{export_training_data, is_training_candidate, TrainingExport};
pub use seed::{default_seed_examples, load_seed_examples};
pub use types::{ChatMessage, Role, TrainingExample};
