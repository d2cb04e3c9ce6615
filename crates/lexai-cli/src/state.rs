//! Application state wiring the conversation core to its infrastructure.
//!
//! Configuration precedence, lowest first: defaults, config file,
//! environment, command-line flags.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use lexai_core::chat::controller::ConversationController;
use lexai_core::query::box_service::BoxQueryService;
use lexai_infra::config::{apply_env_overrides, default_config_path, load_client_config};
use lexai_infra::identity::LocalIdentityProvider;
use lexai_infra::query::HttpQueryService;
use lexai_types::config::ClientConfig;

/// Flags that take precedence over file and environment configuration.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub backend_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl CliOverrides {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.backend_url {
            config.query_service.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.conversation.request_timeout_secs = Some(secs);
        }
    }
}

/// Services used by the CLI commands.
pub struct AppState {
    pub controller: ConversationController,
    /// Where questions are posted, for display.
    pub endpoint: String,
}

impl AppState {
    /// Load configuration and wire the controller to the HTTP query service.
    pub async fn init(overrides: &CliOverrides) -> anyhow::Result<Self> {
        let config_path = overrides
            .config_path
            .clone()
            .unwrap_or_else(default_config_path);

        let mut config = load_client_config(&config_path).await;
        apply_env_overrides(&mut config);
        overrides.apply(&mut config);

        let service = HttpQueryService::new(&config.query_service)
            .context("failed to build HTTP client for the query service")?;
        let endpoint = service.endpoint().to_string();
        info!(
            endpoint = %endpoint,
            timeout_secs = ?config.conversation.request_timeout_secs,
            "Query service configured"
        );

        let identity = LocalIdentityProvider::from_config(&config);
        let controller =
            ConversationController::new(BoxQueryService::new(service), &config.conversation)
                .with_identity(&identity);

        Ok(Self {
            controller,
            endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut config = ClientConfig::default();
        config.conversation.request_timeout_secs = Some(120);

        CliOverrides {
            config_path: None,
            backend_url: Some("https://lex.example.com".to_string()),
            timeout_secs: Some(15),
        }
        .apply(&mut config);

        assert_eq!(config.query_service.base_url, "https://lex.example.com");
        assert_eq!(config.conversation.request_timeout_secs, Some(15));
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut config = ClientConfig::default();
        config.conversation.request_timeout_secs = Some(120);

        CliOverrides::default().apply(&mut config);

        assert_eq!(config.query_service.base_url, "http://localhost:8000");
        assert_eq!(config.conversation.request_timeout_secs, Some(120));
    }
}
