//! Terminal rendering of conversation turns.
//!
//! Answers often carry markdown (lists, emphasis, headings); `ChatRenderer`
//! formats them with `termimad` before printing.

use std::io::{self, Write};

use console::style;
use lexai_types::chat::{Turn, TurnRole};
use termimad::MadSkin;
use termimad::crossterm::style::Color;

/// Markdown renderer for assistant turns.
pub struct ChatRenderer {
    skin: MadSkin,
    width: Option<usize>,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);

        Self { skin, width: None }
    }

    /// Unstyled output at a fixed width.
    pub fn plain(width: usize) -> Self {
        Self {
            skin: MadSkin::no_style(),
            width: Some(width),
        }
    }

    /// Render markdown to terminal text.
    pub fn render(&self, markdown: &str) -> String {
        match self.width {
            Some(width) => self.skin.text(markdown, Some(width)).to_string(),
            None => self.skin.term_text(markdown).to_string(),
        }
    }

    /// Print one turn with its role label.
    pub fn print_turn(&self, out: &mut impl Write, turn: &Turn) -> io::Result<()> {
        match turn.role() {
            TurnRole::User => {
                writeln!(out, "  {} {}", style("You >").green().bold(), turn.content())
            }
            TurnRole::Assistant => {
                writeln!(out)?;
                writeln!(out, "  {}", style("LexAI").cyan().bold())?;
                for line in self.render(turn.content()).trim_end().lines() {
                    writeln!(out, "  {line}")?;
                }
                writeln!(out)
            }
        }
    }

    /// Print an apology turn so it stands out from answers.
    pub fn print_failure(&self, out: &mut impl Write, turn: &Turn) -> io::Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "  {} {}",
            style("!").yellow().bold(),
            style(turn.content()).yellow()
        )?;
        writeln!(out)
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}
