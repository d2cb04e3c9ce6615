//! Main chat loop orchestration.
//!
//! Reads lines, dispatches slash commands, and submits questions through the
//! conversation controller. While a question is pending the loop keeps
//! reading input: Ctrl+C cancels the request and any typed line is turned
//! away, since only one question may be in flight.

use std::io::{self, Write};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline_async::SharedWriter;
use tracing::{debug, info};

use lexai_core::chat::controller::ConversationController;
use lexai_core::chat::lifecycle::SubmitOutcome;

use crate::state::AppState;

use super::banner::{print_header, print_sessions, print_welcome, session_title};
use super::commands::{self, ChatCommand, SessionLookup, resolve_session};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// What the loop does after handling a line.
enum Flow {
    Continue,
    Exit,
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let controller = &state.controller;
    let renderer = ChatRenderer::new();

    let (mut chat_input, mut out) =
        ChatInput::new().map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    print_header(&mut out, &state.endpoint)?;
    print_welcome(&mut out, &controller.greeting_name())?;
    info!(service = controller.service_name(), "Chat started");

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                writeln!(out, "\n  {}", style("Session ended.").dim())?;
                break;
            }
            InputEvent::Interrupted => {
                writeln!(out, "  {}", style("Press Ctrl+D to exit, or keep chatting.").dim())?;
            }
            InputEvent::Blank => {}
            InputEvent::Message(text) => {
                let flow = match commands::parse(&text) {
                    Some(cmd) => handle_command(cmd, controller, &mut chat_input, &mut out)?,
                    None => ask_question(controller, &renderer, &text, &mut chat_input, &mut out).await?,
                };
                if let Flow::Exit = flow {
                    writeln!(out, "\n  {}", style("Session ended.").dim())?;
                    break;
                }
            }
        }
    }

    chat_input.flush();
    Ok(())
}

/// Submit one question and render whatever the transcript gained.
async fn ask_question(
    controller: &ConversationController,
    renderer: &ChatRenderer,
    text: &str,
    chat_input: &mut ChatInput,
    out: &mut SharedWriter,
) -> io::Result<Flow> {
    let spinner = thinking_spinner();
    let mut exit_requested = false;
    chat_input.set_waiting(true);

    let submit = controller.submit_question(text);
    tokio::pin!(submit);

    let outcome = loop {
        tokio::select! {
            outcome = &mut submit => break outcome,
            event = chat_input.read_line() => match event {
                InputEvent::Interrupted => {
                    controller.cancel_pending();
                }
                InputEvent::Eof => {
                    controller.cancel_pending();
                    exit_requested = true;
                }
                InputEvent::Blank => {}
                InputEvent::Message(_) => {
                    writeln!(
                        out,
                        "  {}",
                        style("Still waiting on the previous question (Ctrl+C to cancel).").dim()
                    )?;
                }
            },
        }
    };
    spinner.finish_and_clear();
    chat_input.set_waiting(false);

    match &outcome {
        SubmitOutcome::Answered => {
            if let Some(turn) = controller.transcript().last() {
                renderer.print_turn(out, turn)?;
            }
        }
        SubmitOutcome::Failed(err) => {
            debug!(kind = err.kind(), "Rendering apology");
            if let Some(turn) = controller.transcript().last() {
                renderer.print_failure(out, turn)?;
            }
        }
        SubmitOutcome::Skipped(reason) => {
            debug!(?reason, "Submission skipped");
        }
    }

    Ok(if exit_requested { Flow::Exit } else { Flow::Continue })
}

fn handle_command(
    cmd: ChatCommand,
    controller: &ConversationController,
    chat_input: &mut ChatInput,
    out: &mut SharedWriter,
) -> io::Result<Flow> {
    match cmd {
        ChatCommand::Help => commands::print_help(out)?,
        ChatCommand::Clear => chat_input.clear(),
        ChatCommand::Exit => return Ok(Flow::Exit),
        ChatCommand::New => {
            let id = controller.start_new_session();
            writeln!(
                out,
                "\n  {} Started {}",
                style("+").green().bold(),
                style(session_title(&id)).bold()
            )?;
            print_welcome(out, &controller.greeting_name())?;
        }
        ChatCommand::Sessions => {
            print_sessions(out, &controller.sessions(), controller.current_session())?;
        }
        ChatCommand::Switch(key) => match resolve_session(&controller.sessions(), &key) {
            SessionLookup::Found(id) => {
                controller.select_session(&id);
                writeln!(
                    out,
                    "\n  {} Switched to {}",
                    style(">").cyan().bold(),
                    style(session_title(&id)).bold()
                )?;
                print_transcript(controller, out)?;
            }
            lookup => print_lookup_error(out, &key, &lookup)?,
        },
        ChatCommand::Delete(key) => match resolve_session(&controller.sessions(), &key) {
            SessionLookup::Found(id) => {
                let was_current = controller.current_session() == Some(id);
                controller.remove_session(&id);
                writeln!(
                    out,
                    "\n  {} Deleted {}",
                    style("-").red().bold(),
                    style(session_title(&id)).bold()
                )?;
                if was_current {
                    print_welcome(out, &controller.greeting_name())?;
                }
            }
            lookup => print_lookup_error(out, &key, &lookup)?,
        },
        ChatCommand::History => print_transcript(controller, out)?,
        ChatCommand::Unknown(message) => {
            writeln!(
                out,
                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                style(message).dim()
            )?;
        }
    }
    Ok(Flow::Continue)
}

fn print_transcript(controller: &ConversationController, out: &mut SharedWriter) -> io::Result<()> {
    if !controller.has_transcript() {
        return print_welcome(out, &controller.greeting_name());
    }

    let renderer = ChatRenderer::new();
    writeln!(out)?;
    for turn in controller.transcript() {
        renderer.print_turn(out, &turn)?;
    }
    Ok(())
}

fn print_lookup_error(out: &mut impl Write, key: &str, lookup: &SessionLookup) -> io::Result<()> {
    let message = match lookup {
        SessionLookup::Ambiguous(n) => format!("'{key}' matches {n} sessions, use the #label from /sessions"),
        _ => format!("No session matches '{key}'. Type /sessions to list them."),
    };
    writeln!(out, "\n  {} {message}\n", style("!").yellow().bold())
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message("reviewing your query...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
