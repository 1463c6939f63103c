//! Session state mutated by the stream session controller.
//!
//! `SessionState` is plain synchronous data: every transition is a method that
//! returns the [`StateChange`]s observers must see. The controller serialises
//! access behind a lock and dispatches the changes; nothing else writes here.

use chatwire_types::error::ChatError;
use chatwire_types::event::{MetaEvent, ProtocolEvent};
use chatwire_types::exchange::{ExchangeReport, StreamPhase};
use chatwire_types::session::{ChatStreamRequest, Session};
use chatwire_types::telemetry::Telemetry;
use serde_json::json;

use super::observer::StateChange;

/// Prefix of the assistant text synthesized from an `error` record when no
/// assistant text has arrived yet.
pub const ERROR_TEXT_PREFIX: &str = "[Error] ";

/// One user turn and its streamed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamedExchange {
    pub id: u64,
    pub user_text: String,
    /// Accumulated assistant text. Append-only for the life of the exchange.
    pub text: String,
    pub phase: StreamPhase,
    pub last_error: Option<String>,
}

impl StreamedExchange {
    fn report(&self) -> Option<ExchangeReport> {
        let status = self.phase.terminal_status()?;
        Some(ExchangeReport {
            exchange: self.id,
            status,
            text: self.text.clone(),
            last_error: self.last_error.clone(),
        })
    }
}

/// A started exchange: its id and the request to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeTicket {
    pub id: u64,
    pub request: ChatStreamRequest,
}

/// Read-only copy of the last fully applied state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: Option<String>,
    pub phase: StreamPhase,
    pub exchange: Option<u64>,
    pub text: String,
    pub telemetry: Telemetry,
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    pub fn is_streaming(&self) -> bool {
        self.phase.is_active()
    }

    /// Telemetry plus status as a JSON value for debug output.
    pub fn debug_json(&self) -> serde_json::Value {
        json!({
            "session_id": self.session_id,
            "phase": self.phase.to_string(),
            "status": self.phase.status_label(),
            "model": self.telemetry.model,
            "memory_stats": self.telemetry.memory,
            "last_error": self.last_error,
        })
    }
}

/// The mutable record of the active conversation.
#[derive(Debug, Default)]
pub struct SessionState {
    session: Option<Session>,
    telemetry: Telemetry,
    phase: StreamPhase,
    exchange: Option<StreamedExchange>,
    /// The exchange replaced by the most recent send, kept so a late reader
    /// can still report on it.
    previous: Option<StreamedExchange>,
    last_error: Option<String>,
    next_exchange_id: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn exchange(&self) -> Option<&StreamedExchange> {
        self.exchange.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Bind a session. Telemetry and the previous exchange belong to the old
    /// session and are reset.
    pub fn bind_session(&mut self, session: Session) -> Result<Vec<StateChange>, ChatError> {
        if self.phase.is_active() {
            return Err(ChatError::ExchangeInProgress);
        }
        self.session = Some(session);
        self.telemetry = Telemetry::default();
        self.exchange = None;
        self.previous = None;
        self.last_error = None;
        self.phase = StreamPhase::Idle;

        Ok(vec![
            StateChange::Telemetry(self.telemetry.clone()),
            StateChange::LastError(None),
            StateChange::Phase(StreamPhase::Idle),
        ])
    }

    /// `idle -> sending`. Validates the text and session, and rejects a second
    /// exchange while one is active. On rejection nothing changes.
    pub fn begin_exchange(
        &mut self,
        text: &str,
    ) -> Result<(ExchangeTicket, Vec<StateChange>), ChatError> {
        let cleaned = text.trim();
        if self.phase.is_active() {
            return Err(ChatError::ExchangeInProgress);
        }
        if cleaned.is_empty() {
            return Err(ChatError::EmptyText);
        }
        let session_id = match &self.session {
            Some(session) if !session.id.is_empty() => session.id.clone(),
            _ => return Err(ChatError::NoSession),
        };

        self.next_exchange_id += 1;
        let id = self.next_exchange_id;
        self.previous = self.exchange.take();
        self.exchange = Some(StreamedExchange {
            id,
            user_text: cleaned.to_string(),
            text: String::new(),
            phase: StreamPhase::Sending,
            last_error: None,
        });
        self.phase = StreamPhase::Sending;
        self.last_error = None;

        let ticket = ExchangeTicket {
            id,
            request: ChatStreamRequest {
                session_id,
                text: cleaned.to_string(),
            },
        };
        let changes = vec![
            StateChange::LastError(None),
            StateChange::Streaming(true),
            StateChange::Phase(StreamPhase::Sending),
        ];
        Ok((ticket, changes))
    }

    /// `sending -> streaming`: the server accepted the request. Returns `None`
    /// if exchange `id` is no longer sending (e.g. it was aborted).
    pub fn mark_streaming(&mut self, id: u64) -> Option<Vec<StateChange>> {
        let exchange = self.current_in(id, StreamPhase::Sending)?;
        exchange.text.clear();
        exchange.phase = StreamPhase::Streaming;
        self.phase = StreamPhase::Streaming;
        Some(vec![
            StateChange::Text(String::new()),
            StateChange::Phase(StreamPhase::Streaming),
        ])
    }

    /// Apply one decoded event to exchange `id`.
    ///
    /// Returns `None` when the exchange is no longer streaming; the caller
    /// must stop applying events. State is frozen from the moment the exchange
    /// left `streaming`.
    pub fn apply_event(&mut self, id: u64, event: ProtocolEvent) -> Option<Vec<StateChange>> {
        self.current_in(id, StreamPhase::Streaming)?;

        let changes = match event {
            ProtocolEvent::Meta(MetaEvent::Start { model }) => {
                self.telemetry.set_model(model.as_deref());
                vec![StateChange::Telemetry(self.telemetry.clone())]
            }
            ProtocolEvent::Meta(MetaEvent::MemorySaved) => {
                self.telemetry.record_memory_saved();
                vec![StateChange::Telemetry(self.telemetry.clone())]
            }
            ProtocolEvent::Meta(MetaEvent::MemoryStats(snapshot)) => {
                self.telemetry.apply_memory_stats(&snapshot);
                vec![StateChange::Telemetry(self.telemetry.clone())]
            }
            ProtocolEvent::Delta { text } => {
                let exchange = self.current_in(id, StreamPhase::Streaming)?;
                exchange.text.push_str(&text);
                vec![StateChange::Text(exchange.text.clone())]
            }
            ProtocolEvent::Error { message } => {
                let exchange = self.current_in(id, StreamPhase::Streaming)?;
                exchange.last_error = Some(message.clone());
                let mut changes = Vec::with_capacity(2);
                if exchange.text.is_empty() {
                    exchange.text = format!("{ERROR_TEXT_PREFIX}{message}");
                    changes.push(StateChange::Text(exchange.text.clone()));
                }
                self.last_error = Some(message.clone());
                changes.insert(0, StateChange::LastError(Some(message)));
                changes
            }
        };
        Some(changes)
    }

    /// `streaming -> completed` on end-of-input.
    pub fn complete(&mut self, id: u64) -> Option<Vec<StateChange>> {
        let exchange = self.current_in(id, StreamPhase::Streaming)?;
        exchange.phase = StreamPhase::Completed;
        self.phase = StreamPhase::Completed;
        Some(vec![
            StateChange::Streaming(false),
            StateChange::Phase(StreamPhase::Completed),
        ])
    }

    /// `sending|streaming -> errored` on a transport failure.
    pub fn fail(&mut self, id: u64, message: String) -> Option<Vec<StateChange>> {
        let exchange = self.current_active(id)?;
        exchange.phase = StreamPhase::Errored;
        exchange.last_error = Some(message.clone());
        self.phase = StreamPhase::Errored;
        self.last_error = Some(message.clone());
        Some(vec![
            StateChange::LastError(Some(message)),
            StateChange::Streaming(false),
            StateChange::Phase(StreamPhase::Errored),
        ])
    }

    /// `sending|streaming -> aborted`. Idempotent: returns `None` when no
    /// exchange is active.
    pub fn abort(&mut self) -> Option<(u64, Vec<StateChange>)> {
        if !self.phase.is_active() {
            return None;
        }
        let exchange = self.exchange.as_mut()?;
        exchange.phase = StreamPhase::Aborted;
        self.phase = StreamPhase::Aborted;
        Some((
            exchange.id,
            vec![
                StateChange::Streaming(false),
                StateChange::Phase(StreamPhase::Aborted),
            ],
        ))
    }

    /// Terminal report for exchange `id`, if it has finished and is still
    /// retained.
    pub fn report(&self, id: u64) -> Option<ExchangeReport> {
        [self.exchange.as_ref(), self.previous.as_ref()]
            .into_iter()
            .flatten()
            .find(|exchange| exchange.id == id)
            .and_then(StreamedExchange::report)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session.as_ref().map(|s| s.id.clone()),
            phase: self.phase,
            exchange: self.exchange.as_ref().map(|e| e.id),
            text: self
                .exchange
                .as_ref()
                .map(|e| e.text.clone())
                .unwrap_or_default(),
            telemetry: self.telemetry.clone(),
            last_error: self.last_error.clone(),
        }
    }

    fn current_in(&mut self, id: u64, phase: StreamPhase) -> Option<&mut StreamedExchange> {
        self.exchange
            .as_mut()
            .filter(|exchange| exchange.id == id && exchange.phase == phase)
    }

    fn current_active(&mut self, id: u64) -> Option<&mut StreamedExchange> {
        self.exchange
            .as_mut()
            .filter(|exchange| exchange.id == id && exchange.phase.is_active())
    }
}
