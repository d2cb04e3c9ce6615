//! Client configuration loader for LexAI.
//!
//! Reads `config.toml` from the config directory (`~/.lexai/` unless
//! `LEXAI_HOME` says otherwise) and deserializes it into [`ClientConfig`].
//! Falls back to defaults when the file is missing or malformed, then
//! applies environment overrides.

use std::path::{Path, PathBuf};

use lexai_types::config::ClientConfig;
use lexai_types::identity::CurrentUser;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Overrides the config directory.
pub const HOME_ENV: &str = "LEXAI_HOME";

/// Overrides `query_service.base_url`.
pub const BACKEND_URL_ENV: &str = "LEXAI_BACKEND_URL";

/// Overrides `identity.display_name`.
pub const USER_NAME_ENV: &str = "LEXAI_USER_NAME";

/// Resolve the config directory.
///
/// Priority:
/// 1. `LEXAI_HOME` environment variable
/// 2. `~/.lexai`
/// 3. `.lexai` in the current directory
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".lexai");
    }

    PathBuf::from(".lexai")
}

/// `{config_dir}/config.toml`.
pub fn default_config_path() -> PathBuf {
    resolve_config_dir().join(CONFIG_FILE_NAME)
}

/// Load client configuration from `path`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_client_config(path: &Path) -> ClientConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ClientConfig::default()
        }
    }
}

/// Apply `LEXAI_BACKEND_URL` and `LEXAI_USER_NAME` from the process environment.
pub fn apply_env_overrides(config: &mut ClientConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from any key lookup. Blank values are ignored.
pub fn apply_overrides(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_blank(BACKEND_URL_ENV) {
        tracing::debug!(base_url = %url, "Backend URL overridden from environment");
        config.query_service.base_url = url;
    }
    if let Some(name) = non_blank(USER_NAME_ENV) {
        config.identity.display_name = Some(name);
    }
}

/// The configured user, if a non-blank display name is set.
pub fn configured_user(config: &ClientConfig) -> Option<CurrentUser> {
    config
        .identity
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(CurrentUser::new)
}
