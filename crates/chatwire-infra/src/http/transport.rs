//! HttpStreamTransport -- concrete [`StreamTransport`] over the gateway's
//! `POST /chat/stream` endpoint.
//!
//! The response body is passed through as raw byte chunks; framing and
//! decoding happen in `chatwire-core`. Dropping the returned stream drops the
//! response and closes the connection.

use futures_util::StreamExt;

use chatwire_core::transport::{ByteStream, StreamTransport};
use chatwire_types::config::ClientConfig;
use chatwire_types::error::TransportError;
use chatwire_types::session::ChatStreamRequest;

use super::{build_client, connection_error, error_from_response};

/// Streamed chat transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpStreamTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStreamTransport {
    const STREAM_PATH: &'static str = "/chat/stream";

    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::with_client(build_client(config)?, config.normalized_api_base()))
    }

    /// Reuse an existing client (e.g. the one the gateway client holds).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, Self::STREAM_PATH)
    }
}

impl StreamTransport for HttpStreamTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn open(&self, request: ChatStreamRequest) -> Result<ByteStream, TransportError> {
        let url = self.url();
        tracing::debug!(url = %url, session_id = %request.session_id, "opening reply stream");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        tracing::debug!(status = response.status().as_u16(), "reply stream accepted");

        let mut body = response.bytes_stream();
        let stream: ByteStream = Box::pin(async_stream::try_stream! {
            let mut received: usize = 0;
            while let Some(chunk) = body.next().await {
                let chunk = chunk
                    .map_err(|e| TransportError::Stream(e.to_string()))?;
                received += chunk.len();
                tracing::trace!(bytes = chunk.len(), total = received, "chunk received");
                yield chunk.to_vec();
            }
        });
        Ok(stream)
    }
}
