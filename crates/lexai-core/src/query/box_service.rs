//! BoxQueryService -- object-safe dynamic dispatch wrapper for QueryService.
//!
//! 1. Define an object-safe `QueryServiceDyn` trait with boxed futures
//! 2. Blanket-impl `QueryServiceDyn` for all `T: QueryService`
//! 3. `BoxQueryService` wraps `Box<dyn QueryServiceDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use lexai_types::error::QueryError;

use super::service::QueryService;

/// Object-safe version of [`QueryService`] with boxed futures.
pub trait QueryServiceDyn: Send + Sync {
    fn name(&self) -> &str;

    fn answer_question_boxed<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QueryError>> + Send + 'a>>;
}

impl<T: QueryService> QueryServiceDyn for T {
    fn name(&self) -> &str {
        QueryService::name(self)
    }

    fn answer_question_boxed<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QueryError>> + Send + 'a>> {
        Box::pin(self.answer_question(question))
    }
}

/// Type-erased query service.
///
/// Since `QueryService` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxQueryService` provides the same methods over a
/// `QueryServiceDyn` trait object.
pub struct BoxQueryService {
    inner: Box<dyn QueryServiceDyn + Send + Sync>,
}

impl BoxQueryService {
    /// Wrap a concrete `QueryService` implementation.
    pub fn new<T: QueryService + 'static>(service: T) -> Self {
        Self {
            inner: Box::new(service),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn answer_question(&self, question: &str) -> Result<String, QueryError> {
        self.inner.answer_question_boxed(question).await
    }
}

impl std::fmt::Debug for BoxQueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxQueryService")
            .field("name", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl QueryService for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn answer_question(&self, question: &str) -> Result<String, QueryError> {
            Ok(format!("you asked: {question}"))
        }
    }

    #[tokio::test]
    async fn boxed_service_delegates() {
        let service = BoxQueryService::new(Echo);
        assert_eq!(service.name(), "echo");
        let answer = service.answer_question("hi").await.unwrap();
        assert_eq!(answer, "you asked: hi");
    }
}
