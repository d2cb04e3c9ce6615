//! LexAI terminal client entry point.
//!
//! Binary name: `lexai`
//!
//! Parses CLI arguments, loads configuration, wires the conversation
//! controller to the HTTP query service, then runs the interactive chat or
//! a one-shot question.

mod cli;
mod state;

use std::process::ExitCode;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use lexai_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = verbosity_filter(cli.quiet, cli.verbose);
    if let Err(e) = init_tracing(filter, cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    // Shell completions don't need app state
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "lexai", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let state = AppState::init(&cli.overrides()).await?;

    let result = match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&state)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Ask { question } => cli::ask::ask(&state, &question.join(" ")).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}
