//! Wire bodies exchanged with the question-answering service.
//!
//! The service accepts `POST {"question": "..."}` and answers with
//! `{"response": "..."}` on success or `{"detail": ...}` on failure.

use serde::{Deserialize, Serialize};

/// Request body for the query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

/// Success body from the query endpoint.
///
/// Every field is optional so that a missing answer can be reported as a
/// protocol error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerBody {
    /// The service echoes the question back; it is not used.
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

/// Error body from the query endpoint.
///
/// `detail` is usually a string but may be any JSON value (validation
/// errors arrive as a list of objects).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_request_shape() {
        let body = QuestionRequest {
            question: "What is a contract?".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"question":"What is a contract?"}"#);
    }

    #[test]
    fn test_answer_body_tolerates_missing_response() {
        let body: AnswerBody = serde_json::from_str("{}").unwrap();
        assert!(body.response.is_none());
    }

    #[test]
    fn test_answer_body_ignores_echoed_question() {
        let body: AnswerBody =
            serde_json::from_str(r#"{"question":"q","response":"a"}"#).unwrap();
        assert_eq!(body.response.as_deref(), Some("a"));
    }

    #[test]
    fn test_error_body_accepts_structured_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert!(body.detail.unwrap().is_array());
    }
}
