//! Observability setup for chatwire: structured logging through `tracing`,
//! with optional span export to OpenTelemetry.

pub mod tracing_setup;
