//! QueryService trait definition.
//!
//! Uses RPITIT for `answer_question`; see `BoxQueryService` for the
//! object-safe wrapper.

use lexai_types::error::QueryError;

/// Trait for question-answering backends.
///
/// Implementations live in lexai-infra (e.g., `HttpQueryService`).
pub trait QueryService: Send + Sync {
    /// Human-readable backend name, used in tracing spans.
    fn name(&self) -> &str;

    /// Send one question and receive the answer text.
    ///
    /// Implementations report every failure (transport, status, protocol)
    /// as a [`QueryError`]; they never panic on bad responses.
    fn answer_question(
        &self,
        question: &str,
    ) -> impl std::future::Future<Output = Result<String, QueryError>> + Send;
}
