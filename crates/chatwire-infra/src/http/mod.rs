//! HTTP adapters for the chat gateway.
//!
//! Both adapters share one `reqwest::Client` configuration: a connect timeout
//! from [`ClientConfig::request_timeout_secs`] and no overall request timeout,
//! since a streamed reply may legitimately run for a long time.

pub mod gateway;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_server;

use std::time::Duration;

use chatwire_types::config::ClientConfig;
use chatwire_types::error::TransportError;

pub use gateway::GatewayClient;
pub use transport::HttpStreamTransport;

/// Build the shared HTTP client.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, TransportError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(concat!("chatwire/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TransportError::Connection(format!("failed to build HTTP client: {e}")))
}

/// Map a send failure to a [`TransportError`].
pub(crate) fn connection_error(err: reqwest::Error) -> TransportError {
    TransportError::Connection(err.to_string())
}

/// Turn a non-success response into [`TransportError::Http`], reading the body
/// as text for the message.
pub(crate) async fn error_from_response(response: reqwest::Response) -> TransportError {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("").to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %body, "gateway returned an error status");
    TransportError::Http {
        status: status.as_u16(),
        reason,
        body,
    }
}
