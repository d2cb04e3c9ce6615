//! One-shot `lexai ask <question>`.

use std::io::Write;
use std::process::ExitCode;

use console::style;
use lexai_core::chat::lifecycle::{SkipReason, SubmitOutcome};

use crate::state::AppState;

use super::chat::renderer::ChatRenderer;

/// Submit a single question and print the assistant turn.
///
/// Exits non-zero when the question fails or is empty.
pub async fn ask(state: &AppState, question: &str) -> anyhow::Result<ExitCode> {
    let controller = &state.controller;
    let outcome = controller.submit_question(question).await;

    let renderer = ChatRenderer::new();
    let mut stdout = std::io::stdout().lock();

    let code = match &outcome {
        SubmitOutcome::Answered => {
            if let Some(turn) = controller.transcript().last() {
                writeln!(stdout, "{}", renderer.render(turn.content()).trim_end())?;
            }
            ExitCode::SUCCESS
        }
        SubmitOutcome::Failed(err) => {
            tracing::debug!(kind = err.kind(), "Question failed");
            if let Some(turn) = controller.transcript().last() {
                writeln!(stdout, "{}", turn.content())?;
            }
            ExitCode::FAILURE
        }
        SubmitOutcome::Skipped(SkipReason::EmptyQuestion) => {
            eprintln!("{} The question is empty.", style("!").yellow().bold());
            ExitCode::from(2)
        }
        SubmitOutcome::Skipped(SkipReason::RequestPending) => {
            // Nothing else submits in one-shot mode.
            ExitCode::FAILURE
        }
    };

    Ok(code)
}
