//! Infrastructure layer for chatwire.
//!
//! Contains the concrete adapters behind the ports defined in `chatwire-core`:
//! the reqwest-based streamed transport, the gateway client used to create
//! sessions, and configuration loading from the data directory.

pub mod config;
pub mod filesystem;
pub mod http;
