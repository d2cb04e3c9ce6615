//! In-process query service doubles for lifecycle and controller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lexai_types::error::QueryError;
use tokio::sync::Notify;

use crate::query::service::QueryService;

/// Replies from a fixed script, then a default answer once exhausted.
pub struct ScriptedService {
    replies: Mutex<VecDeque<Result<String, QueryError>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedService {
    pub fn new(replies: Vec<Result<String, QueryError>>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = Self {
            replies: Mutex::new(replies.into()),
            calls: calls.clone(),
        };
        (service, calls)
    }
}

impl QueryService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn answer_question(&self, _question: &str) -> Result<String, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("default answer".to_string()))
    }
}

/// Answers only after the gate is notified.
pub struct GatedService {
    gate: Arc<Notify>,
    answer: String,
    calls: Arc<AtomicUsize>,
}

impl GatedService {
    pub fn new(gate: Arc<Notify>, answer: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = Self {
            gate,
            answer: answer.to_string(),
            calls: calls.clone(),
        };
        (service, calls)
    }
}

impl QueryService for GatedService {
    fn name(&self) -> &str {
        "gated"
    }

    async fn answer_question(&self, _question: &str) -> Result<String, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.answer.clone())
    }
}

/// Never answers.
pub struct StalledService;

impl QueryService for StalledService {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn answer_question(&self, _question: &str) -> Result<String, QueryError> {
        std::future::pending().await
    }
}
