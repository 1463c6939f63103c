use thiserror::Error;

/// Errors raised synchronously by the stream session controller.
///
/// These reject a request before any transport call is made; no phase
/// transition happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("message text is empty")]
    EmptyText,

    #[error("no active session; create a session first")]
    NoSession,

    #[error("a reply is already streaming")]
    ExchangeInProgress,
}

/// Errors from the transport that carries streamed replies and gateway calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} {reason} :: {body}")]
    Http {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("connection failed: {0}")]
    Connection(String),

    /// Reading the response body failed mid-stream.
    #[error("stream read failed: {0}")]
    Stream(String),

    /// A non-streamed response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_matches_client_format() {
        let err = TransportError::Http {
            status: 404,
            reason: "Not Found".to_string(),
            body: "{\"detail\":\"session missing\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 Not Found :: {\"detail\":\"session missing\"}"
        );
    }

    #[test]
    fn test_chat_error_messages() {
        assert_eq!(ChatError::EmptyText.to_string(), "message text is empty");
        assert_eq!(
            ChatError::ExchangeInProgress.to_string(),
            "a reply is already streaming"
        );
    }
}
