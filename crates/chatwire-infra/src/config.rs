//! Client configuration loader for chatwire.
//!
//! Reads `config.toml` from the data directory (`~/.chatwire/` by default)
//! and deserializes it into [`ClientConfig`]. Falls back to defaults when the
//! file is missing or malformed, then layers environment overrides on top.

use std::path::Path;

use chatwire_types::config::ClientConfig;

/// Overrides [`ClientConfig::api_base`].
pub const ENV_API_BASE: &str = "CHATWIRE_API_BASE";

/// Overrides [`ClientConfig::user_id`].
pub const ENV_USER_ID: &str = "CHATWIRE_USER_ID";

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply `CHATWIRE_API_BASE` and `CHATWIRE_USER_ID` from the process
/// environment.
pub fn apply_env_overrides(config: ClientConfig) -> ClientConfig {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup. Empty values are
/// ignored.
pub fn apply_overrides_from<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(api_base) = non_empty(ENV_API_BASE) {
        tracing::debug!(api_base = %api_base, "api base overridden from environment");
        config.api_base = api_base;
    }
    if let Some(user_id) = non_empty(ENV_USER_ID) {
        config.user_id = Some(user_id);
    }
    config
}
