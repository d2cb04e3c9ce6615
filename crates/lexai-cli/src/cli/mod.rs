//! CLI command definitions for the `lexai` binary.
//!
//! Uses clap derive macros for argument parsing. Running `lexai` with no
//! subcommand starts the interactive chat.

pub mod ask;
pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::state::CliOverrides;

/// Ask legal questions from the terminal.
#[derive(Parser)]
#[command(name = "lexai", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (default: ~/.lexai/config.toml).
    #[arg(long, global = true, env = "LEXAI_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Query service base URL. Overrides config and LEXAI_BACKEND_URL.
    #[arg(long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Give up on a question after this many seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed logs (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_path: self.config.clone(),
            backend_url: self.backend_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (the default).
    Chat,

    /// Ask a single question and print the answer.
    Ask {
        /// The question. Multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["lexai"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn ask_joins_words() {
        let cli = Cli::try_parse_from(["lexai", "ask", "What", "is", "a", "contract?"]).unwrap();
        match cli.command {
            Some(Commands::Ask { question }) => {
                assert_eq!(question.join(" "), "What is a contract?");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn ask_requires_question() {
        assert!(Cli::try_parse_from(["lexai", "ask"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lexai",
            "ask",
            "hi",
            "--backend-url",
            "http://10.0.0.5:9000",
            "--timeout",
            "30",
            "-vv",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.backend_url.as_deref(), Some("http://10.0.0.5:9000"));
        assert_eq!(overrides.timeout_secs, Some(30));
        assert_eq!(cli.verbose, 2);
    }
}
