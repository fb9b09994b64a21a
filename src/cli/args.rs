//! Command-line argument parsing for AltTextBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::config::Config;

/// AltTextBuddy - Alt text generation with feedback-driven fine-tuning data
#[derive(Parser, Debug)]
#[command(name = "alttextbuddy")]
#[command(version)]
#[command(about = "Generate image alt text and turn user feedback into training data", long_about = None)]
pub struct Args {
    /// Listen host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides config and PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Feedback store file (overrides config)
    #[arg(long)]
    pub feedback_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Subcommand (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Print the feedback analytics summary
    Analytics {
        /// Print raw JSON instead of the table
        #[arg(long)]
        json: bool,
    },

    /// Export feedback-derived training examples as JSONL
    Export {
        /// Output file (defaults to storage.feedback_export_file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the complete corpus: seed examples plus recent improved feedback
    ExportCorpus,

    /// Fine-tuning job management
    #[command(subcommand)]
    FineTune(FineTuneCommand),
}

/// Fine-tuning subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FineTuneCommand {
    /// Upload the corpus and start a job
    Create,

    /// Show the status of a job
    Status {
        /// Job id returned by `create`
        job_id: String,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to run
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }

    /// Apply flag overrides on top of file and environment config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(file) = &self.feedback_file {
            config.storage.feedback_file = file.clone();
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("alttextbuddy").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_command_is_serve() {
        let args = parse(&[]);
        assert_eq!(args.command(), Commands::Serve);
        assert_eq!(args.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["-vv"]).verbosity(), Verbosity::VeryVerbose);
        assert_eq!(parse(&["-q", "-vv"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_subcommands() {
        assert_eq!(
            parse(&["analytics", "--json"]).command(),
            Commands::Analytics { json: true }
        );
        assert_eq!(
            parse(&["export", "-o", "out.jsonl"]).command(),
            Commands::Export { output: Some(PathBuf::from("out.jsonl")) }
        );
        assert_eq!(parse(&["export-corpus"]).command(), Commands::ExportCorpus);
        assert_eq!(
            parse(&["fine-tune", "status", "ftjob-1"]).command(),
            Commands::FineTune(FineTuneCommand::Status { job_id: "ftjob-1".to_string() })
        );
    }

    #[test]
    fn test_overrides() {
        let args = parse(&["--host", "0.0.0.0", "--port", "8080", "--feedback-file", "/tmp/f.json"]);
        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage.feedback_file, PathBuf::from("/tmp/f.json"));
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = Config::default();
        parse(&["serve"]).apply_overrides(&mut config);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_verbosity_as_str() {
        assert_eq!(Verbosity::Quiet.as_str(), "quiet");
        assert_eq!(Verbosity::VeryVerbose.as_str(), "very_verbose");
    }
}
