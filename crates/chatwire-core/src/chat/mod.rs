//! Session state and the stream session controller.

pub mod controller;
pub mod observer;
pub mod state;

pub use controller::StreamController;
pub use observer::{StateChange, StreamObserver};
pub use state::{SessionSnapshot, SessionState};
