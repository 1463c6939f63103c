//! Local axum server for adapter tests.

use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A request as received by the server.
pub(crate) struct Captured {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// Canned reply served to every request.
#[derive(Clone)]
struct Reply {
    status: StatusCode,
    content_type: &'static str,
    chunks: Vec<Vec<u8>>,
    captured: mpsc::UnboundedSender<Captured>,
}

async fn respond(
    State(reply): State<Reply>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let _ = reply.captured.send(Captured {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    });

    // Pause between chunks so the client observes separate reads.
    let chunks = reply.chunks;
    let stream = async_stream::stream! {
        for chunk in chunks {
            yield Ok::<_, std::io::Error>(Bytes::from(chunk));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };

    (
        reply.status,
        [(header::CONTENT_TYPE, reply.content_type)],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Start a server on an ephemeral port that answers every JSON request with
/// `status` and a body streamed as `chunks`.
///
/// Returns the base URL and a receiver yielding each captured request.
pub(crate) async fn serve_reply(
    status: StatusCode,
    content_type: &'static str,
    chunks: Vec<Vec<u8>>,
) -> (String, mpsc::UnboundedReceiver<Captured>) {
    let (captured, requests) = mpsc::unbounded_channel();
    let router = Router::new().fallback(respond).with_state(Reply {
        status,
        content_type,
        chunks,
        captured,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (base, requests)
}
