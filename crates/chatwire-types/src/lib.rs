//! Shared domain types for chatwire.
//!
//! Sessions, the streamed protocol events, telemetry, exchange lifecycle
//! enums, client configuration and the error types shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod exchange;
pub mod session;
pub mod telemetry;
