//! Shared state for CLI commands.

use chatwire_infra::config::{apply_env_overrides, load_client_config};
use chatwire_infra::filesystem::resolve_data_dir;
use chatwire_infra::http::GatewayClient;
use chatwire_types::config::ClientConfig;

/// Configuration and clients every command needs.
pub struct AppState {
    pub config: ClientConfig,
    pub gateway: GatewayClient,
}

impl AppState {
    /// Load configuration with the precedence flags > environment > file >
    /// defaults, and build the gateway client.
    pub async fn init(api_base: Option<String>, user: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let mut config = apply_env_overrides(load_client_config(&data_dir).await);

        if let Some(api_base) = api_base {
            config.api_base = api_base;
        }
        if let Some(user) = user {
            config.user_id = Some(user);
        }

        tracing::debug!(
            data_dir = %data_dir.display(),
            api_base = %config.normalized_api_base(),
            "configuration loaded"
        );

        let gateway = GatewayClient::new(&config)?;
        Ok(Self { config, gateway })
    }
}
