use lexai_types::chat::Turn;

/// Append-only transcript for one conversation.
///
/// Insertion order is conversation order; existing turns are never
/// reordered or replaced.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    turns: Vec<Turn>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Read-only view of every turn in order.
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// True when there is nothing to show but the welcome state.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
