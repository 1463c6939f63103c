//! Observer interface for UI sinks.
//!
//! The controller calls observers synchronously as it applies events, after
//! releasing its internal lock, so an observer may read a snapshot or cancel
//! the exchange from inside a callback.

use chatwire_types::exchange::StreamPhase;
use chatwire_types::telemetry::Telemetry;

/// Callback sink for controller state changes.
///
/// Every method has a no-op default; implement only what the UI shows.
pub trait StreamObserver: Send + Sync {
    /// Assistant text changed. Always the full accumulated text, never a
    /// fragment.
    fn on_text(&self, _text: &str) {}

    fn on_telemetry(&self, _telemetry: &Telemetry) {}

    /// Last error changed. `None` clears it at the start of an exchange.
    fn on_error(&self, _error: Option<&str>) {}

    /// An exchange started (`true`) or reached a terminal phase (`false`).
    fn on_streaming(&self, _streaming: bool) {}

    fn on_phase(&self, _phase: StreamPhase) {}
}

/// One observable change produced by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Text(String),
    Telemetry(Telemetry),
    LastError(Option<String>),
    Streaming(bool),
    Phase(StreamPhase),
}

impl StateChange {
    /// Invoke the matching callback on `observer`.
    pub fn deliver(&self, observer: &dyn StreamObserver) {
        match self {
            StateChange::Text(text) => observer.on_text(text),
            StateChange::Telemetry(telemetry) => observer.on_telemetry(telemetry),
            StateChange::LastError(error) => observer.on_error(error.as_deref()),
            StateChange::Streaming(streaming) => observer.on_streaming(*streaming),
            StateChange::Phase(phase) => observer.on_phase(*phase),
        }
    }
}
