//! Welcome banner and session listing for the chat loop.

use std::io::{self, Write};

use console::style;
use lexai_types::chat::{SessionId, SessionSummary};

/// Printed while the active transcript is empty.
pub fn print_welcome(out: &mut impl Write, name: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style(format!("Hello {name}!")).cyan().bold())?;
    writeln!(out, "  {}", style("You've got a legal query?").bold())?;
    writeln!(out, "  {}", style("Consider it handled.").dim())?;
    writeln!(out)
}

/// Printed once when the chat starts.
pub fn print_header(out: &mut impl Write, endpoint: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {} {}", style("§").bold(), style("LexAI").cyan().bold())?;
    writeln!(out, "  {}  {}", style("Service:").bold(), style(endpoint).dim())?;
    writeln!(
        out,
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    )?;
    writeln!(out, "  {}", style("---").dim())
}

/// Display name for a session.
pub fn session_title(id: &SessionId) -> String {
    format!("Legal Query #{}", id.short())
}

/// `/sessions` output, newest first, current session marked.
pub fn print_sessions(
    out: &mut impl Write,
    sessions: &[SessionSummary],
    current: Option<SessionId>,
) -> io::Result<()> {
    writeln!(out)?;
    if sessions.is_empty() {
        writeln!(out, "  {}", style("No previous chats").dim())?;
        return writeln!(out);
    }

    for (i, session) in sessions.iter().enumerate() {
        let marker = if Some(session.id) == current { "*" } else { " " };
        let preview = if session.last_message.is_empty() {
            "No messages yet..."
        } else {
            session.last_message.as_str()
        };
        writeln!(
            out,
            "  {} {:>2}  {}  {}",
            style(marker).green().bold(),
            i + 1,
            style(session_title(&session.id)).bold(),
            style(preview).dim()
        )?;
    }
    writeln!(out)
}
