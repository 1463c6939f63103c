//! StreamTransport trait definition.
//!
//! The port through which the stream controller opens a streamed chat
//! request. Uses RPITIT for `open`, and `Pin<Box<dyn Stream>>` for the body so
//! the controller can hold it across reads without knowing the concrete
//! transport.
//!
//! Implementations live in chatwire-infra (e.g. `HttpStreamTransport`).

use std::future::Future;
use std::pin::Pin;

use futures_util::Stream;

use chatwire_types::error::TransportError;
use chatwire_types::session::ChatStreamRequest;

/// Ordered raw chunks of a streamed response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, TransportError>> + Send + 'static>>;

/// Opens cancellable streamed requests.
///
/// `open` resolves once the server has accepted the request and started
/// responding; a non-success response is an `Err`. The returned stream yields
/// body chunks in order until end-of-stream. Dropping the stream tears the
/// underlying connection down, which is how the controller stops a read it no
/// longer wants.
pub trait StreamTransport: Send + Sync {
    /// Human-readable transport name (e.g. "http").
    fn name(&self) -> &str;

    /// Open a streamed chat request.
    fn open(
        &self,
        request: ChatStreamRequest,
    ) -> impl Future<Output = Result<ByteStream, TransportError>> + Send;
}
