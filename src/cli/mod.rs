//! CLI module for AltTextBuddy
//!
//! Handles command-line argument parsing and configuration management.

pub mod config;
pub mod args;

pub use config::Config;
pub use args::{Args, Commands, FineTuneCommand, Verbosity};
