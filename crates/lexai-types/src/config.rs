//! Client configuration types for LexAI.
//!
//! `ClientConfig` represents the `config.toml` that points the client at a
//! query service and tunes conversation behavior. Every section and field
//! has a default, so an empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level client configuration.
///
/// Loaded from `~/.lexai/config.toml` unless a path is given explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub query_service: QueryServiceConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Where and how to reach the question-answering service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_query_path")]
    pub query_path: String,

    /// TCP connect timeout. Absent means the HTTP client default.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_query_path() -> String {
    "/query".to_string()
}

impl Default for QueryServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            query_path: default_query_path(),
            connect_timeout_secs: None,
        }
    }
}

/// Conversation core tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Maximum characters kept in a session's last-message preview.
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,

    /// Deadline for one query round-trip. Absent means wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_summary_max_chars() -> usize {
    80
}

impl ConversationConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            summary_max_chars: default_summary_max_chars(),
            request_timeout_secs: None,
        }
    }
}

/// Seed for the local identity provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub display_name: Option<String>,
}
