//! ConversationController: the composition root for the conversation core.
//!
//! Wires question submission through the [`RequestLifecycle`] into the
//! active transcript, and exposes session management and a read side for
//! the UI layer. The active transcript is the current session's log, or a
//! scratch transcript when no session is current.

use std::sync::{Mutex, MutexGuard};

use lexai_types::chat::{SessionId, SessionSummary, Turn};
use lexai_types::config::ConversationConfig;
use lexai_types::identity::{self, CurrentUser};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::lifecycle::{LifecycleState, RequestLifecycle, RequestPolicy, SubmitOutcome};
use super::log::MessageLog;
use super::registry::SessionRegistry;
use crate::identity::IdentityProvider;
use crate::query::box_service::BoxQueryService;

/// Where the turns of one submission are delivered.
///
/// Captured when the user turn is appended so the reply follows the
/// question, not whatever transcript is active when the answer arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplyTarget {
    Session(SessionId),
    Scratch { generation: u64 },
}

/// Everything the controller mutates, guarded by a single lock.
#[derive(Debug)]
struct ConversationState {
    registry: SessionRegistry,
    scratch: MessageLog,
    scratch_generation: u64,
}

impl ConversationState {
    fn active_target(&self) -> ReplyTarget {
        match self.registry.current_session_id() {
            Some(id) => ReplyTarget::Session(id),
            None => ReplyTarget::Scratch {
                generation: self.scratch_generation,
            },
        }
    }

    fn active_log(&self) -> &MessageLog {
        match self.registry.current() {
            Some(session) => session.log(),
            None => &self.scratch,
        }
    }

    fn deliver(&mut self, target: ReplyTarget, turn: Turn) {
        match target {
            ReplyTarget::Session(id) => {
                if !self.registry.append_turn(&id, turn) {
                    warn!(session_id = %id, "Dropping turn for deleted session");
                }
            }
            ReplyTarget::Scratch { generation } if generation == self.scratch_generation => {
                self.scratch.append(turn);
            }
            ReplyTarget::Scratch { generation } => {
                warn!(
                    generation,
                    current = self.scratch_generation,
                    "Dropping turn for cleared scratch transcript"
                );
            }
        }
    }

    fn reset_scratch(&mut self) {
        self.scratch = MessageLog::new();
        self.scratch_generation += 1;
    }
}

/// Conversation facade used by the front end.
///
/// All methods take `&self`; the UI can read state or cancel while a
/// submission is awaiting the query service.
pub struct ConversationController {
    lifecycle: RequestLifecycle,
    state: Mutex<ConversationState>,
    cancel: Mutex<CancellationToken>,
    identity: Option<watch::Receiver<Option<CurrentUser>>>,
}

impl ConversationController {
    pub fn new(service: BoxQueryService, config: &ConversationConfig) -> Self {
        let policy = RequestPolicy {
            timeout: config.request_timeout(),
        };
        Self {
            lifecycle: RequestLifecycle::new(service, policy),
            state: Mutex::new(ConversationState {
                registry: SessionRegistry::new(config.summary_max_chars),
                scratch: MessageLog::new(),
                scratch_generation: 0,
            }),
            cancel: Mutex::new(CancellationToken::new()),
            identity: None,
        }
    }

    /// Attach an identity provider for greeting text.
    pub fn with_identity(mut self, provider: &dyn IdentityProvider) -> Self {
        self.identity = Some(provider.subscribe());
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().expect("conversation state lock poisoned")
    }

    // ------------------------------------------------------------------
    // Write side
    // ------------------------------------------------------------------

    /// Submit a question into the active transcript.
    ///
    /// Returns once the transcript has been reconciled. Skipped submissions
    /// (empty text, request already pending) leave everything untouched.
    pub async fn submit_question(&self, text: &str) -> SubmitOutcome {
        let cancel = self
            .cancel
            .lock()
            .expect("cancel token lock poisoned")
            .child_token();

        let mut target: Option<ReplyTarget> = None;
        self.lifecycle
            .submit(text, &cancel, |turn| {
                let mut state = self.lock_state();
                let destination = *target.get_or_insert_with(|| state.active_target());
                state.deliver(destination, turn);
            })
            .await
    }

    /// Create a fresh session and make it the active transcript.
    pub fn start_new_session(&self) -> SessionId {
        let mut state = self.lock_state();
        state.reset_scratch();
        state.registry.create_session()
    }

    /// Delete a session. Returns false if it did not exist.
    ///
    /// If it backed the active transcript, the active transcript becomes an
    /// empty scratch transcript.
    pub fn remove_session(&self, id: &SessionId) -> bool {
        let mut state = self.lock_state();
        let was_current = state.registry.current_session_id().as_ref() == Some(id);
        let removed = state.registry.delete_session(id);
        if removed && was_current {
            state.reset_scratch();
        }
        removed
    }

    /// Make a past session current. Returns false for an unknown id.
    pub fn select_session(&self, id: &SessionId) -> bool {
        let mut state = self.lock_state();
        let leaving_scratch = state.registry.current_session_id().is_none();
        let selected = state.registry.select_session(id);
        if selected && leaving_scratch {
            state.reset_scratch();
        }
        selected
    }

    /// Cancel the in-flight request, if any.
    ///
    /// The pending submission settles with a cancellation apology.
    pub fn cancel_pending(&self) {
        let mut cancel = self.cancel.lock().expect("cancel token lock poisoned");
        if self.lifecycle.state().is_pending() {
            info!("Cancelling pending request");
        } else {
            debug!("Cancel requested with no pending request");
        }
        cancel.cancel();
        *cancel = CancellationToken::new();
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    /// Owned copy of the active transcript.
    pub fn transcript(&self) -> Vec<Turn> {
        self.lock_state().active_log().snapshot().to_vec()
    }

    /// False means the UI should show the welcome state.
    pub fn has_transcript(&self) -> bool {
        !self.lock_state().active_log().is_empty()
    }

    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.lock_state().registry.list_sessions()
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.lock_state().registry.current_session_id()
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.lifecycle.subscribe()
    }

    /// Input is disabled while a request is pending.
    pub fn input_enabled(&self) -> bool {
        !self.lifecycle.state().is_pending()
    }

    /// First name of the current user, or "Guest".
    pub fn greeting_name(&self) -> String {
        match &self.identity {
            Some(rx) => identity::greeting_name(rx.borrow().as_ref()).to_string(),
            None => identity::GUEST_NAME.to_string(),
        }
    }

    pub fn service_name(&self) -> &str {
        self.lifecycle.service_name()
    }
}

impl std::fmt::Debug for ConversationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationController")
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}
