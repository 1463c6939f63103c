//! Stream session controller.
//!
//! Owns one in-flight streamed exchange at a time: opens the request through a
//! [`StreamTransport`], pumps body chunks through the [`FrameSplitter`] and the
//! decoder, folds events into [`SessionState`] and notifies observers.
//!
//! The controller is cheap to clone; clones share the same state, so one task
//! can await [`StreamController::send`] while another calls
//! [`StreamController::cancel`].
//!
//! Suspension happens at exactly two points: waiting for the request to be
//! accepted and waiting for the next chunk. Splitting, decoding and applying
//! events in between is synchronous, and each event is applied under the
//! state lock after checking that the exchange is still streaming. Once
//! cancelled, no further event is applied even if more frames are already
//! buffered.
//!
//! Changes are queued under the same lock that applies them and delivered to
//! observers in that order by a single drainer. A change applied before a
//! cancel is therefore always delivered before the `aborted` phase, even when
//! the cancel comes from another thread or from inside an observer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

use chatwire_types::error::ChatError;
use chatwire_types::exchange::{ExchangeReport, ExchangeStatus, StreamPhase};
use chatwire_types::session::Session;

use crate::protocol::decode_frame;
use crate::sse::FrameSplitter;
use crate::transport::StreamTransport;

use super::observer::{StateChange, StreamObserver};
use super::state::{ExchangeTicket, SessionSnapshot, SessionState};

/// State plus the cancellation token of the active exchange, guarded together
/// so cancel and apply never interleave.
#[derive(Default)]
struct Shared {
    state: SessionState,
    cancel: Option<CancellationToken>,
    /// Applied changes not yet handed to observers, oldest first.
    outbox: VecDeque<StateChange>,
    /// Set while some caller is draining `outbox`.
    delivering: bool,
}

struct Inner<T> {
    transport: T,
    shared: Mutex<Shared>,
    observers: RwLock<Vec<Arc<dyn StreamObserver>>>,
}

/// Drives streamed exchanges for one bound session.
pub struct StreamController<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for StreamController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: StreamTransport> StreamController<T> {
    /// Create an idle controller with no session bound.
    pub fn new(transport: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                shared: Mutex::new(Shared::default()),
                observers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Register an observer. It receives every change from now on.
    pub fn subscribe(&self, observer: Arc<dyn StreamObserver>) {
        self.inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Bind the session subsequent exchanges are sent to.
    ///
    /// Rejected while an exchange is active.
    pub fn bind_session(&self, session: Session) -> Result<(), ChatError> {
        let session_id = session.id.clone();
        let mut shared = self.lock();
        let changes = shared.state.bind_session(session)?;
        info!(session_id = %session_id, "session bound");
        self.publish(shared, changes);
        Ok(())
    }

    /// Last fully applied state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().state.snapshot()
    }

    pub fn phase(&self) -> StreamPhase {
        self.lock().state.phase()
    }

    pub fn is_streaming(&self) -> bool {
        self.phase().is_active()
    }

    /// Stop the active exchange.
    ///
    /// The exchange becomes `aborted` immediately and its observable state
    /// freezes; the transport is torn down when the pump notices. Returns
    /// `false` (and does nothing) when no exchange is active.
    pub fn cancel(&self) -> bool {
        let mut shared = self.lock();
        let Some((exchange, changes)) = shared.state.abort() else {
            return false;
        };
        if let Some(token) = shared.cancel.take() {
            token.cancel();
        }
        info!(exchange, "exchange cancelled");
        self.publish(shared, changes);
        true
    }

    /// Send `text` and stream the reply until a terminal phase.
    ///
    /// Rejects synchronously, before any transport call, when the trimmed text
    /// is empty, no session is bound, or an exchange is already active. All
    /// other outcomes (including transport failure and cancellation) are
    /// reported through the returned [`ExchangeReport`].
    pub async fn send(&self, text: &str) -> Result<ExchangeReport, ChatError> {
        let (ticket, token) = self.begin(text)?;
        let id = ticket.id;
        let span = tracing::info_span!(
            "exchange",
            session_id = %ticket.request.session_id,
            exchange = id,
            transport = self.inner.transport.name(),
        );

        self.pump(ticket, token).instrument(span).await;

        let report = self.lock().state.report(id);
        Ok(report.unwrap_or_else(|| ExchangeReport {
            exchange: id,
            status: ExchangeStatus::Aborted,
            text: String::new(),
            last_error: None,
        }))
    }

    fn begin(&self, text: &str) -> Result<(ExchangeTicket, CancellationToken), ChatError> {
        let mut shared = self.lock();
        let (ticket, changes) = shared.state.begin_exchange(text)?;
        let token = CancellationToken::new();
        shared.cancel = Some(token.clone());
        debug!(exchange = ticket.id, chars = ticket.request.text.len(), "exchange started");
        self.publish(shared, changes);
        Ok((ticket, token))
    }

    async fn pump(&self, ticket: ExchangeTicket, token: CancellationToken) {
        let id = ticket.id;

        let opened = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("cancelled before the request was accepted");
                return;
            }
            opened = self.inner.transport.open(ticket.request) => opened,
        };

        let mut stream = match opened {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "request failed");
                self.fail(id, err.to_string());
                return;
            }
        };

        if !self.transition(|state| state.mark_streaming(id)) {
            return;
        }
        debug!("streaming");

        let mut splitter = FrameSplitter::new();
        let mut applied: u64 = 0;
        let mut discarded: u64 = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(applied, discarded, "stopped reading after cancel");
                    return;
                }
                next = stream.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    for frame in splitter.push_bytes(&chunk) {
                        let Some(event) = decode_frame(&frame) else {
                            discarded += 1;
                            continue;
                        };
                        let kind = event.kind();
                        if !self.transition(|state| state.apply_event(id, event)) {
                            debug!(applied, kind, "exchange no longer streaming; dropping rest");
                            return;
                        }
                        applied += 1;
                    }
                }
                Some(Err(err)) => {
                    warn!(error = %err, applied, "stream read failed");
                    self.fail(id, err.to_string());
                    return;
                }
                None => {
                    if splitter.pending_len() > 0 {
                        debug!(
                            pending = splitter.pending_len(),
                            "end of stream with an unterminated frame; discarding"
                        );
                    }
                    if self.transition(|state| state.complete(id)) {
                        self.release_token(id);
                        info!(applied, discarded, "exchange completed");
                    }
                    return;
                }
            }
        }
    }

    fn fail(&self, id: u64, message: String) {
        if self.transition(|state| state.fail(id, message)) {
            self.release_token(id);
        }
    }

    /// Run a state transition under the lock and publish its changes.
    /// Returns whether the transition applied.
    fn transition<F>(&self, apply: F) -> bool
    where
        F: FnOnce(&mut SessionState) -> Option<Vec<StateChange>>,
    {
        let mut shared = self.lock();
        match apply(&mut shared.state) {
            Some(changes) => {
                self.publish(shared, changes);
                true
            }
            None => false,
        }
    }

    fn release_token(&self, id: u64) {
        let mut shared = self.lock();
        let current = shared.state.exchange().map(|exchange| exchange.id);
        if current == Some(id) {
            shared.cancel = None;
        }
    }

    /// Queue `changes` behind everything applied earlier, then deliver the
    /// queue unless another caller is already doing so.
    ///
    /// Takes the guard that applied the changes so nothing can be applied in
    /// between. Observers run with the lock released; a cancel issued from a
    /// callback only enqueues and is delivered by the running drainer.
    fn publish<'a>(&'a self, mut shared: MutexGuard<'a, Shared>, changes: Vec<StateChange>) {
        shared.outbox.extend(changes);
        if shared.delivering {
            return;
        }
        shared.delivering = true;
        loop {
            let Some(change) = shared.outbox.pop_front() else {
                shared.delivering = false;
                return;
            };
            drop(shared);
            let observers = self
                .inner
                .observers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            for observer in &observers {
                change.deliver(observer.as_ref());
            }
            shared = self.lock();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner
            .shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
