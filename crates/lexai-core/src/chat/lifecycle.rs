//! Single in-flight query lifecycle.
//!
//! `RequestLifecycle` runs one question through the [`BoxQueryService`] and
//! reconciles the outcome into a transcript. The state machine is
//! `Idle -> Pending -> {SettledSuccess, SettledError} -> Idle`, published on
//! a `tokio::sync::watch` channel so the UI can disable input while a
//! request is pending.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lexai_types::chat::Turn;
use lexai_types::error::{NO_RESPONSE_DATA, QueryError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::query::box_service::BoxQueryService;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Pending,
    SettledSuccess,
    SettledError,
}

impl LifecycleState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LifecycleState::Pending)
    }
}

/// Why a submission did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The question was empty after trimming.
    EmptyQuestion,
    /// Another request is still in flight.
    RequestPending,
}

/// Result of [`RequestLifecycle::submit`].
///
/// By the time this is returned the transcript has already been
/// reconciled; the outcome is only a report for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Answered,
    Failed(QueryError),
    Skipped(SkipReason),
}

impl SubmitOutcome {
    /// Whether the submission passed its preconditions and produced turns.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SubmitOutcome::Skipped(_))
    }
}

/// Deadline policy for a query round-trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestPolicy {
    /// `None` waits for the service indefinitely.
    pub timeout: Option<Duration>,
}

/// Assistant text shown in place of an answer when a query fails.
pub fn apology(err: &QueryError) -> String {
    format!("I apologize, but I encountered an error: {err}. Please try again.")
}

/// Drives one question at a time against the query service.
pub struct RequestLifecycle {
    service: BoxQueryService,
    policy: RequestPolicy,
    in_flight: AtomicBool,
    state: watch::Sender<LifecycleState>,
}

impl RequestLifecycle {
    pub fn new(service: BoxQueryService, policy: RequestPolicy) -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);
        Self {
            service,
            policy,
            in_flight: AtomicBool::new(false),
            state,
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    pub fn policy(&self) -> RequestPolicy {
        self.policy
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    /// Submit a question and reconcile the outcome through `append`.
    ///
    /// Empty questions and submissions while another request is pending are
    /// skipped without touching the transcript or calling the service.
    /// Otherwise `append` receives the trimmed user turn before the state is
    /// published as `Pending`, and exactly one assistant turn (the answer or
    /// an apology) once the request settles. Cancelling `cancel` or hitting
    /// the policy timeout settles the request as a failure.
    pub async fn submit<F>(
        &self,
        question: &str,
        cancel: &CancellationToken,
        mut append: F,
    ) -> SubmitOutcome
    where
        F: FnMut(Turn) + Send,
    {
        let question = question.trim();
        if question.is_empty() {
            debug!("Ignoring empty question");
            return SubmitOutcome::Skipped(SkipReason::EmptyQuestion);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Ignoring submission while a request is pending");
            return SubmitOutcome::Skipped(SkipReason::RequestPending);
        }
        let _guard = InFlightGuard { lifecycle: self };

        append(Turn::user(question));
        self.state.send_replace(LifecycleState::Pending);

        let span = info_span!(
            "query.submit",
            service = self.service.name(),
            question_len = question.len(),
        );
        let result = self.dispatch(question, cancel).instrument(span.clone()).await;
        let _entered = span.enter();

        match result {
            Ok(answer) => {
                info!(answer_len = answer.len(), "Query answered");
                self.state.send_replace(LifecycleState::SettledSuccess);
                append(Turn::assistant(answer));
                SubmitOutcome::Answered
            }
            Err(err) => {
                warn!(kind = err.kind(), error = ?err, "Query failed");
                self.state.send_replace(LifecycleState::SettledError);
                append(Turn::assistant(apology(&err)));
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn dispatch(&self, question: &str, cancel: &CancellationToken) -> Result<String, QueryError> {
        let call = async {
            match self.policy.timeout {
                Some(limit) => tokio::time::timeout(limit, self.service.answer_question(question))
                    .await
                    .unwrap_or(Err(QueryError::Timeout(limit))),
                None => self.service.answer_question(question).await,
            }
        };

        let answer = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(QueryError::Cancelled),
            result = call => result?,
        };

        if answer.is_empty() {
            return Err(QueryError::protocol(NO_RESPONSE_DATA));
        }
        Ok(answer)
    }
}

impl std::fmt::Debug for RequestLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLifecycle")
            .field("service", &self.service.name())
            .field("policy", &self.policy)
            .field("state", &self.state())
            .finish()
    }
}

/// Returns the lifecycle to `Idle` when a submission ends, including when
/// its future is dropped mid-flight.
struct InFlightGuard<'a> {
    lifecycle: &'a RequestLifecycle,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        // Publish Idle before releasing the flag so a new submission's
        // Pending is never overwritten.
        self.lifecycle.state.send_replace(LifecycleState::Idle);
        self.lifecycle.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use lexai_types::chat::TurnRole;
    use tokio::sync::Notify;

    use super::*;
    use crate::chat::log::MessageLog;
    use crate::chat::testing::{GatedService, ScriptedService, StalledService};

    fn lifecycle_with(service: BoxQueryService) -> RequestLifecycle {
        RequestLifecycle::new(service, RequestPolicy::default())
    }

    fn contents(log: &MessageLog) -> Vec<(TurnRole, String)> {
        log.snapshot()
            .iter()
            .map(|t| (t.role(), t.content().to_string()))
            .collect()
    }

    #[tokio::test]
    async fn answered_question_appends_user_then_assistant() {
        let (service, calls) = ScriptedService::new(vec![Ok("A contract is...".to_string())]);
        let lifecycle = lifecycle_with(BoxQueryService::new(service));
        let mut log = MessageLog::new();

        let outcome = lifecycle
            .submit("What is a contract?", &CancellationToken::new(), |t| log.append(t))
            .await;

        assert_eq!(outcome, SubmitOutcome::Answered);
        assert_eq!(
            contents(&log),
            vec![
                (TurnRole::User, "What is a contract?".to_string()),
                (TurnRole::Assistant, "A contract is...".to_string()),
            ]
        );
        assert_eq!(lifecycle.state(), LifecycleState::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn question_is_trimmed_before_sending() {
        let (service, _calls) = ScriptedService::new(vec![Ok("ok".to_string())]);
        let lifecycle = lifecycle_with(BoxQueryService::new(service));
        let mut log = MessageLog::new();

        lifecycle
            .submit("  padded question \n", &CancellationToken::new(), |t| log.append(t))
            .await;

        assert_eq!(log.snapshot()[0].content(), "padded question");
    }

    #[tokio::test]
    async fn whitespace_question_is_skipped() {
        let (service, calls) = ScriptedService::new(vec![]);
        let lifecycle = lifecycle_with(BoxQueryService::new(service));
        let mut log = MessageLog::new();

        let outcome = lifecycle
            .submit("   \t ", &CancellationToken::new(), |t| log.append(t))
            .await;

        assert_eq!(outcome, SubmitOutcome::Skipped(SkipReason::EmptyQuestion));
        assert!(!outcome.is_accepted());
        assert!(log.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(lifecycle.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn status_error_becomes_apology_turn() {
        let (service, _calls) = ScriptedService::new(vec![Err(QueryError::Status {
            status: 500,
            detail: "internal failure".to_string(),
        })]);
        let lifecycle = lifecycle_with(BoxQueryService::new(service));
        let mut log = MessageLog::new();

        let outcome = lifecycle
            .submit("test", &CancellationToken::new(), |t| log.append(t))
            .await;

        assert!(matches!(outcome, SubmitOutcome::Failed(QueryError::Status { status: 500, .. })));
        assert_eq!(log.len(), 2);
        let reply = &log.snapshot()[1];
        assert_eq!(reply.role(), TurnRole::Assistant);
        assert_eq!(
            reply.content(),
            "I apologize, but I encountered an error: internal failure. Please try again."
        );
        assert_eq!(lifecycle.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn empty_answer_is_protocol_error() {
        let (service, _calls) = ScriptedService::new(vec![Ok(String::new())]);
        let lifecycle = lifecycle_with(BoxQueryService::new(service));
        let mut log = MessageLog::new();

        let outcome = lifecycle
            .submit("test", &CancellationToken::new(), |t| log.append(t))
            .await;

        assert_eq!(outcome, SubmitOutcome::Failed(QueryError::protocol(NO_RESPONSE_DATA)));
        assert!(log.snapshot()[1].content().contains("No response data received"));
    }

    #[tokio::test]
    async fn user_turn_is_visible_before_pending() {
        let gate = Arc::new(Notify::new());
        let (service, _calls) = GatedService::new(gate.clone(), "answer");
        let lifecycle = lifecycle_with(BoxQueryService::new(service));
        let log = Mutex::new(MessageLog::new());
        let mut rx = lifecycle.subscribe();
        let token = CancellationToken::new();

        let submit = lifecycle.submit("question", &token, |t| {
            log.lock().unwrap().append(t)
        });
        let observer = async {
            rx.wait_for(LifecycleState::is_pending).await.unwrap();
            let turns = contents(&log.lock().unwrap());
            gate.notify_one();
            turns
        };

        let (outcome, at_pending) = tokio::join!(submit, observer);

        assert_eq!(outcome, SubmitOutcome::Answered);
        assert_eq!(at_pending, vec![(TurnRole::User, "question".to_string())]);
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_rejected() {
        let gate = Arc::new(Notify::new());
        let (service, calls) = GatedService::new(gate.clone(), "answer");
        let lifecycle = lifecycle_with(BoxQueryService::new(service));
        let log = Mutex::new(MessageLog::new());
        let token = CancellationToken::new();
        let mut rx = lifecycle.subscribe();

        let first = lifecycle.submit("first", &token, |t| log.lock().unwrap().append(t));
        let second = async {
            rx.wait_for(LifecycleState::is_pending).await.unwrap();
            let outcome = lifecycle
                .submit("second", &token, |t| log.lock().unwrap().append(t))
                .await;
            let len_while_pending = log.lock().unwrap().len();
            let state_while_pending = lifecycle.state();
            gate.notify_one();
            (outcome, len_while_pending, state_while_pending)
        };

        let (first_outcome, (second_outcome, len, state)) = tokio::join!(first, second);

        assert_eq!(first_outcome, SubmitOutcome::Answered);
        assert_eq!(second_outcome, SubmitOutcome::Skipped(SkipReason::RequestPending));
        assert_eq!(len, 1);
        assert_eq!(state, LifecycleState::Pending);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn lifecycle_accepts_again_after_settling() {
        let (service, calls) = ScriptedService::new(vec![
            Err(QueryError::transport("connection refused")),
            Ok("second answer".to_string()),
        ]);
        let lifecycle = lifecycle_with(BoxQueryService::new(service));
        let mut log = MessageLog::new();
        let token = CancellationToken::new();

        lifecycle.submit("one", &token, |t| log.append(t)).await;
        let outcome = lifecycle.submit("two", &token, |t| log.append(t)).await;

        assert_eq!(outcome, SubmitOutcome::Answered);
        assert_eq!(log.len(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            log.snapshot()[1].content(),
            "I apologize, but I encountered an error: Network error: unable to reach the query service. Please try again."
        );
    }

    #[tokio::test]
    async fn cancellation_settles_with_one_apology() {
        let lifecycle = lifecycle_with(BoxQueryService::new(StalledService));
        let log = Mutex::new(MessageLog::new());
        let token = CancellationToken::new();
        let mut rx = lifecycle.subscribe();

        let submit = lifecycle.submit("slow question", &token, |t| log.lock().unwrap().append(t));
        let canceller = async {
            rx.wait_for(LifecycleState::is_pending).await.unwrap();
            token.cancel();
        };

        let (outcome, ()) = tokio::join!(submit, canceller);

        assert_eq!(outcome, SubmitOutcome::Failed(QueryError::Cancelled));
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.snapshot()[1].content().contains("Request was cancelled"));
        assert_eq!(lifecycle.state(), LifecycleState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_settles_with_one_apology() {
        let lifecycle = RequestLifecycle::new(
            BoxQueryService::new(StalledService),
            RequestPolicy {
                timeout: Some(Duration::from_secs(30)),
            },
        );
        let mut log = MessageLog::new();

        let outcome = lifecycle
            .submit("slow question", &CancellationToken::new(), |t| log.append(t))
            .await;

        assert_eq!(outcome, SubmitOutcome::Failed(QueryError::Timeout(Duration::from_secs(30))));
        assert_eq!(log.len(), 2);
        assert!(log.snapshot()[1].content().contains("timed out after 30s"));
        assert_eq!(lifecycle.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn dropped_submission_returns_to_idle() {
        let lifecycle = lifecycle_with(BoxQueryService::new(StalledService));
        let mut log = MessageLog::new();
        let token = CancellationToken::new();

        {
            let submit = lifecycle.submit("abandoned", &token, |t| log.append(t));
            tokio::pin!(submit);
            tokio::select! {
                biased;
                _ = &mut submit => panic!("stalled service must not answer"),
                _ = tokio::task::yield_now() => {}
            }
            assert_eq!(lifecycle.state(), LifecycleState::Pending);
        }

        assert_eq!(lifecycle.state(), LifecycleState::Idle);
        assert_eq!(log.len(), 1);

        // The in-flight flag was released: a new submission is accepted
        // (and settles immediately against an already-cancelled token).
        let cancelled = CancellationToken::new();
        cancelled.cancel();
        let outcome = lifecycle.submit("again", &cancelled, |t| log.append(t)).await;
        assert_eq!(outcome, SubmitOutcome::Failed(QueryError::Cancelled));
        assert_eq!(log.len(), 3);
    }
}
