//! HttpQueryService -- [`QueryService`] over the LexAI HTTP endpoint.
//!
//! Sends `POST {base_url}{query_path}` with `{"question": "..."}` and maps
//! the response onto [`QueryError`]: transport failures, non-2xx statuses
//! (with the server's `detail` as the user-facing text), and success bodies
//! that are not JSON or carry no answer.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};

use lexai_core::query::service::QueryService;
use lexai_types::config::QueryServiceConfig;
use lexai_types::error::{
    MALFORMED_RESPONSE, NO_RESPONSE_DATA, NON_JSON_RESPONSE, QueryError, SERVER_ERROR_DETAIL,
    UNKNOWN_ERROR_DETAIL,
};
use lexai_types::query::{AnswerBody, ErrorBody, QuestionRequest};

/// HTTP client for the question-answering service.
///
/// Only the connect timeout is set on the underlying client. The deadline
/// for the whole round-trip is the request lifecycle's policy.
#[derive(Debug, Clone)]
pub struct HttpQueryService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQueryService {
    pub fn new(config: &QueryServiceConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: join_url(&config.base_url, &config.query_path),
        })
    }

    /// Full URL questions are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QueryService for HttpQueryService {
    fn name(&self) -> &str {
        "http"
    }

    async fn answer_question(&self, question: &str) -> Result<String, QueryError> {
        let body = QuestionRequest {
            question: question.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "Query request failed");
                QueryError::transport(e.to_string())
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response
            .text()
            .await
            .map_err(|e| QueryError::transport(format!("failed to read response body: {e}")))?;

        debug!(
            status = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or(""),
            body_len = text.len(),
            "Query response received"
        );

        interpret_response(status, content_type.as_deref(), &text)
    }
}

/// Map a completed HTTP exchange onto an answer or a [`QueryError`].
pub fn interpret_response(
    status: StatusCode,
    content_type: Option<&str>,
    body: &str,
) -> Result<String, QueryError> {
    if !status.is_success() {
        return Err(QueryError::Status {
            status: status.as_u16(),
            detail: extract_error_detail(body),
        });
    }

    if !content_type.is_some_and(|ct| ct.contains("application/json")) {
        return Err(QueryError::protocol(NON_JSON_RESPONSE));
    }

    let answer: AnswerBody =
        serde_json::from_str(body).map_err(|_| QueryError::protocol(MALFORMED_RESPONSE))?;

    match answer.response {
        Some(response) if !response.is_empty() => Ok(response),
        _ => Err(QueryError::protocol(NO_RESPONSE_DATA)),
    }
}

/// User-facing detail for an error response body.
///
/// A JSON body yields its `detail` field (non-string values rendered as
/// compact JSON), otherwise the raw text. Blank values fall back to fixed
/// messages.
pub fn extract_error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            // Only an object can carry `detail`; any other JSON is "unknown".
            let detail = match value {
                serde_json::Value::Object(_) => serde_json::from_value::<ErrorBody>(value)
                    .ok()
                    .and_then(|b| b.detail),
                _ => None,
            };
            match detail {
                Some(serde_json::Value::String(s)) if !s.is_empty() => s,
                Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
                    UNKNOWN_ERROR_DETAIL.to_string()
                }
                Some(other) => other.to_string(),
            }
        }
        Err(_) => {
            let text = body.trim();
            if text.is_empty() {
                SERVER_ERROR_DETAIL.to_string()
            } else {
                text.to_string()
            }
        }
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
