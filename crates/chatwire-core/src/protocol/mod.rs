//! Decoding of frame payloads into typed protocol events.

pub mod decoder;

pub use decoder::{decode_event, decode_frame};
