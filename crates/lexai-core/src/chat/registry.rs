//! Session registry: the set of independent chat sessions.
//!
//! Sessions are kept newest-first. At most one session is current; the
//! current id is a back-reference into the registry and is cleared in the
//! same call that deletes the session it points to.

use std::collections::VecDeque;

use lexai_types::chat::{SessionId, SessionSummary, Turn};
use tracing::{debug, info};

use super::log::MessageLog;

/// Default length of a session's last-message preview.
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 80;

/// Collapse whitespace and cut `text` to at most `max_chars` characters.
///
/// A truncated preview ends with an ellipsis, which counts toward the limit.
pub fn summarize(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut preview: String = collapsed.chars().take(max_chars - 1).collect();
    preview.push('…');
    preview
}

/// One conversation thread and its cached preview.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    summary: String,
    log: MessageLog,
}

impl Session {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            summary: String::new(),
            log: MessageLog::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn to_summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            last_message: self.summary.clone(),
        }
    }
}

/// Owns every session and tracks which one is current.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: VecDeque<Session>,
    current: Option<SessionId>,
    summary_max_chars: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_MAX_CHARS)
    }
}

impl SessionRegistry {
    pub fn new(summary_max_chars: usize) -> Self {
        Self {
            sessions: VecDeque::new(),
            current: None,
            summary_max_chars,
        }
    }

    /// Create an empty session, make it current, and return its id.
    pub fn create_session(&mut self) -> SessionId {
        let mut id = SessionId::new();
        while self.position(&id).is_some() {
            id = SessionId::new();
        }

        self.sessions.push_front(Session::new(id));
        self.current = Some(id);
        info!(session_id = %id, total = self.sessions.len(), "Session created");
        id
    }

    /// Remove a session. Returns false (and changes nothing) if it is absent.
    ///
    /// Deleting the current session leaves no session current.
    pub fn delete_session(&mut self, id: &SessionId) -> bool {
        let Some(index) = self.position(id) else {
            debug!(session_id = %id, "Delete ignored, session not found");
            return false;
        };

        self.sessions.remove(index);
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }
        info!(session_id = %id, total = self.sessions.len(), "Session deleted");
        true
    }

    /// Replace a session's preview text. No-op for an unknown id.
    pub fn update_summary(&mut self, id: &SessionId, text: &str) {
        let max_chars = self.summary_max_chars;
        if let Some(session) = self.get_mut(id) {
            session.summary = summarize(text, max_chars);
        }
    }

    /// Append a turn to a session's log and refresh its preview.
    ///
    /// Returns false if the session no longer exists.
    pub fn append_turn(&mut self, id: &SessionId, turn: Turn) -> bool {
        let Some(session) = self.get_mut(id) else {
            return false;
        };
        session.log.append(turn);
        if let Some(content) = session.log.last().map(|t| t.content().to_string()) {
            self.update_summary(id, &content);
        }
        true
    }

    /// Make an existing session current. Returns false for an unknown id.
    pub fn select_session(&mut self, id: &SessionId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.current = Some(*id);
        debug!(session_id = %id, "Session selected");
        true
    }

    /// Id, preview pairs, most recently created first.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.sessions.iter().map(Session::to_summary).collect()
    }

    pub fn current_session_id(&self) -> Option<SessionId> {
        self.current
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| &s.id == id)
    }

    fn position(&self, id: &SessionId) -> Option<usize> {
        self.sessions.iter().position(|s| &s.id == id)
    }
}
