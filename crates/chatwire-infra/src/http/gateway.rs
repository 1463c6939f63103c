//! Gateway client for non-streamed calls.
//!
//! Only session creation is needed by the client: `POST /session/create`
//! returns the new session together with the character and scenario it was
//! created for.

use chatwire_types::config::ClientConfig;
use chatwire_types::error::TransportError;
use chatwire_types::session::{CreateSessionRequest, CreateSessionResponse};

use super::{build_client, connection_error, error_from_response};
use super::transport::HttpStreamTransport;

/// JSON client for the chat gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    const CREATE_SESSION_PATH: &'static str = "/session/create";

    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.normalized_api_base().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A streamed transport sharing this client's connection pool.
    pub fn stream_transport(&self) -> HttpStreamTransport {
        HttpStreamTransport::with_client(self.client.clone(), &self.base_url)
    }

    /// Create a session for `user_id` with the given character and scenario.
    pub async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, TransportError> {
        let url = format!("{}{}", self.base_url, Self::CREATE_SESSION_PATH);
        tracing::debug!(
            url = %url,
            character_id = %request.character_id,
            scenario_id = %request.scenario_id,
            "creating session"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Stream(e.to_string()))?;
        let created: CreateSessionResponse = serde_json::from_str(&body)
            .map_err(|e| TransportError::Decode(format!("session/create: {e}")))?;

        tracing::info!(session_id = %created.session.id, "session created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};

    use crate::http::test_server::serve_reply;

    fn client_for(base: &str) -> GatewayClient {
        let config = ClientConfig {
            api_base: format!("{base}/"),
            ..ClientConfig::default()
        };
        GatewayClient::new(&config).unwrap()
    }

    fn request() -> CreateSessionRequest {
        CreateSessionRequest {
            user_id: "u-1".to_string(),
            character_id: "chr_01".to_string(),
            scenario_id: "scn_01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_session_parses_response() {
        let body = r#"{
            "ok": true,
            "session": {"id": "sess-77", "user_id": "u-1", "character_id": "chr_01", "scenario_id": "scn_01", "status": "active"},
            "character": {"id": "chr_01", "name": "Mira"},
            "scenario": {"id": "scn_01", "name": "Night Market", "first_message": "The lanterns flicker.", "story": "..."}
        }"#;
        let (base, mut requests) =
            serve_reply(StatusCode::OK, "application/json", vec![body.as_bytes().to_vec()]).await;

        let client = client_for(&base);
        assert_eq!(client.base_url(), base);
        let created = client.create_session(&request()).await.unwrap();

        assert_eq!(created.session.id, "sess-77");
        let scenario = created.scenario.unwrap();
        assert_eq!(scenario.first_message.as_deref(), Some("The lanterns flicker."));
        assert_eq!(created.character.unwrap().name.as_deref(), Some("Mira"));

        let captured = requests.recv().await.unwrap();
        assert_eq!(captured.method, Method::POST);
        assert_eq!(captured.path, "/session/create");
        assert_eq!(captured.body["user_id"], "u-1");
        assert_eq!(captured.body["scenario_id"], "scn_01");
    }

    #[tokio::test]
    async fn test_create_session_rejected() {
        let (base, _requests) = serve_reply(
            StatusCode::BAD_REQUEST,
            "application/json",
            vec![br#"{"detail":"Invalid character_id"}"#.to_vec()],
        )
        .await;

        let err = client_for(&base).create_session(&request()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"HTTP 400 Bad Request :: {"detail":"Invalid character_id"}"#
        );
    }

    #[tokio::test]
    async fn test_create_session_bad_body_is_decode_error() {
        let (base, _requests) = serve_reply(
            StatusCode::OK,
            "application/json",
            vec![b"<html>oops</html>".to_vec()],
        )
        .await;

        let err = client_for(&base).create_session(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)), "{err:?}");
    }
}
