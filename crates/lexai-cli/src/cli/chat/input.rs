//! Line input for the chat loop.
//!
//! `ChatInput` owns the readline prompt and switches it while a question is
//! pending, so the user can see that typed lines won't be submitted. Output
//! goes through the `SharedWriter` returned by [`ChatInput::new`] so it never
//! tears the prompt.

use console::style;
use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// What the user did at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A non-blank line, trimmed.
    Message(String),
    /// Enter on an empty or whitespace-only line.
    Blank,
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

impl InputEvent {
    fn from_readline(event: Result<ReadlineEvent, ReadlineError>) -> Self {
        match event {
            Ok(ReadlineEvent::Line(line)) => match line.trim() {
                "" => Self::Blank,
                text => Self::Message(text.to_string()),
            },
            Ok(ReadlineEvent::Interrupted) => Self::Interrupted,
            Ok(ReadlineEvent::Eof) | Err(_) => Self::Eof,
        }
    }
}

fn idle_prompt() -> String {
    format!("  {} ", style("You >").green().bold())
}

fn waiting_prompt() -> String {
    format!("  {} ", style("... >").dim())
}

/// Readline wrapper that tracks whether a question is pending.
pub struct ChatInput {
    rl: Readline,
    waiting: bool,
}

impl ChatInput {
    /// Returns the input handler and the writer all chat output goes through.
    pub fn new() -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, out) = Readline::new(idle_prompt())?;
        Ok((Self { rl, waiting: false }, out))
    }

    /// Switch the prompt while a question is in flight.
    pub fn set_waiting(&mut self, waiting: bool) {
        if self.waiting == waiting {
            return;
        }
        self.waiting = waiting;
        let prompt = if waiting { waiting_prompt() } else { idle_prompt() };
        let _ = self.rl.update_prompt(&prompt);
    }

    /// Read one line. Submitted lines go into history.
    ///
    /// Cancel-safe: the chat loop races this against a pending request.
    pub async fn read_line(&mut self) -> InputEvent {
        let event = InputEvent::from_readline(self.rl.readline().await);
        if let InputEvent::Message(text) = &event {
            self.rl.add_history_entry(text.clone());
        }
        event
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Write out anything still buffered in the shared writer.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
