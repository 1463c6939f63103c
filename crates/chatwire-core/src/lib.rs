//! Streaming session client for chatwire.
//!
//! Turns the raw byte chunks of a streamed chat reply into typed events and
//! folds them into session state:
//!
//! - [`sse`] splits the byte stream into frames, resumably across reads.
//! - [`protocol`] decodes one frame payload into a [`ProtocolEvent`].
//! - [`chat`] owns the session state and the stream session controller.
//! - [`transport`] is the port the controller opens streamed requests through.
//!
//! This crate depends only on `chatwire-types` -- never on `chatwire-infra`
//! or any HTTP crate.
//!
//! [`ProtocolEvent`]: chatwire_types::event::ProtocolEvent

pub mod chat;
pub mod protocol;
pub mod sse;
pub mod transport;
