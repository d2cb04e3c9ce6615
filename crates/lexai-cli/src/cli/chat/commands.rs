//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for sessions,
//! history, and help. Sessions are addressed by their 1-based position in
//! `/sessions` or by the `#label` printed next to them.

use std::io::{self, Write};

use console::style;
use lexai_types::chat::{SessionId, SessionSummary};

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Start a new session.
    New,
    /// List sessions, newest first.
    Sessions,
    /// Make another session current.
    Switch(String),
    /// Delete a session.
    Delete(String),
    /// Show the active transcript.
    History,
    /// Unknown or malformed command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts
        .get(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" => Some(ChatCommand::New),
        "/sessions" | "/ls" => Some(ChatCommand::Sessions),
        "/history" => Some(ChatCommand::History),
        "/switch" | "/sw" => Some(match arg {
            Some(key) => ChatCommand::Switch(key),
            None => ChatCommand::Unknown("/switch requires a session number or id".to_string()),
        }),
        "/delete" | "/rm" => Some(match arg {
            Some(key) => ChatCommand::Delete(key),
            None => ChatCommand::Unknown("/delete requires a session number or id".to_string()),
        }),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Result of resolving a `/switch` or `/delete` argument.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionLookup {
    Found(SessionId),
    NotFound,
    /// The id prefix matched this many sessions.
    Ambiguous(usize),
}

/// Resolve a session by 1-based list position or id.
///
/// A bare number is always a position. Anything else, or a key written with
/// a leading `#`, matches the `#label` shown in listings by prefix, or the
/// start of the full id.
pub fn resolve_session(sessions: &[SessionSummary], key: &str) -> SessionLookup {
    let key = key.trim();
    let (key, by_id) = match key.strip_prefix('#') {
        Some(rest) => (rest, true),
        None => (key, false),
    };

    if !by_id {
        if let Ok(position) = key.parse::<usize>() {
            return match position.checked_sub(1).and_then(|i| sessions.get(i)) {
                Some(summary) => SessionLookup::Found(summary.id),
                None => SessionLookup::NotFound,
            };
        }
    }

    let needle = key.to_lowercase();
    if needle.is_empty() {
        return SessionLookup::NotFound;
    }
    let matches: Vec<SessionId> = sessions
        .iter()
        .filter(|s| s.id.short().starts_with(&needle) || s.id.to_string().starts_with(&needle))
        .map(|s| s.id)
        .collect();

    match matches.as_slice() {
        [] => SessionLookup::NotFound,
        [id] => SessionLookup::Found(*id),
        many => SessionLookup::Ambiguous(many.len()),
    }
}

/// Print the help text listing all available commands.
pub fn print_help(out: &mut impl Write) -> io::Result<()> {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
        ("/new", "Start a new session"),
        ("/sessions", "List sessions, newest first"),
        ("/switch <n>", "Switch to session n (or its #label)"),
        ("/delete <n>", "Delete session n (or its #label)"),
        ("/history", "Show the current transcript"),
    ];

    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    for (name, help) in rows {
        writeln!(out, "  {}  {}", style(format!("{name:<12}")).cyan(), help)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style("Ctrl+C cancels a pending question, Ctrl+D exits").dim()
    )?;
    writeln!(out)
}
