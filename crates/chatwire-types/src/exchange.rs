//! Lifecycle types for a streamed exchange.
//!
//! A streamed exchange is one user turn followed by one streamed assistant
//! reply. The controller moves through [`StreamPhase`]:
//!
//! ```text
//! idle -> sending -> streaming -> { completed | aborted | errored }
//! ```
//!
//! Terminal phases behave like `idle` for the purpose of starting the next
//! exchange.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phase of the stream session controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamPhase {
    #[default]
    Idle,
    Sending,
    Streaming,
    Completed,
    Aborted,
    Errored,
}

impl StreamPhase {
    /// Whether an exchange is in flight (a new send must be rejected).
    pub fn is_active(self) -> bool {
        matches!(self, StreamPhase::Sending | StreamPhase::Streaming)
    }

    /// Terminal status for completed/aborted/errored phases.
    pub fn terminal_status(self) -> Option<ExchangeStatus> {
        match self {
            StreamPhase::Completed => Some(ExchangeStatus::Ok),
            StreamPhase::Aborted => Some(ExchangeStatus::Aborted),
            StreamPhase::Errored => Some(ExchangeStatus::Errored),
            StreamPhase::Idle | StreamPhase::Sending | StreamPhase::Streaming => None,
        }
    }

    /// Neutral status text for display. Cancellation reads "stopped", never
    /// as an error.
    pub fn status_label(self) -> &'static str {
        match self {
            StreamPhase::Idle => "idle",
            StreamPhase::Sending | StreamPhase::Streaming => "streaming...",
            StreamPhase::Completed => "done",
            StreamPhase::Aborted => "stopped",
            StreamPhase::Errored => "stream error",
        }
    }
}

impl fmt::Display for StreamPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamPhase::Idle => write!(f, "idle"),
            StreamPhase::Sending => write!(f, "sending"),
            StreamPhase::Streaming => write!(f, "streaming"),
            StreamPhase::Completed => write!(f, "completed"),
            StreamPhase::Aborted => write!(f, "aborted"),
            StreamPhase::Errored => write!(f, "errored"),
        }
    }
}

impl FromStr for StreamPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(StreamPhase::Idle),
            "sending" => Ok(StreamPhase::Sending),
            "streaming" => Ok(StreamPhase::Streaming),
            "completed" => Ok(StreamPhase::Completed),
            "aborted" => Ok(StreamPhase::Aborted),
            "errored" => Ok(StreamPhase::Errored),
            other => Err(format!("invalid stream phase: '{other}'")),
        }
    }
}

/// Terminal status of a streamed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeStatus {
    Ok,
    Aborted,
    Errored,
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeStatus::Ok => write!(f, "ok"),
            ExchangeStatus::Aborted => write!(f, "aborted"),
            ExchangeStatus::Errored => write!(f, "errored"),
        }
    }
}

/// Outcome of one streamed exchange, returned once it reaches a terminal phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeReport {
    /// Sequence number of the exchange within the controller.
    pub exchange: u64,
    pub status: ExchangeStatus,
    /// Accumulated assistant text at the moment the exchange ended.
    pub text: String,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_phases() {
        assert!(StreamPhase::Sending.is_active());
        assert!(StreamPhase::Streaming.is_active());
        assert!(!StreamPhase::Idle.is_active());
        assert!(!StreamPhase::Completed.is_active());
        assert!(!StreamPhase::Aborted.is_active());
        assert!(!StreamPhase::Errored.is_active());
    }

    #[test]
    fn test_terminal_status_mapping() {
        assert_eq!(
            StreamPhase::Completed.terminal_status(),
            Some(ExchangeStatus::Ok)
        );
        assert_eq!(
            StreamPhase::Aborted.terminal_status(),
            Some(ExchangeStatus::Aborted)
        );
        assert_eq!(
            StreamPhase::Errored.terminal_status(),
            Some(ExchangeStatus::Errored)
        );
        assert_eq!(StreamPhase::Streaming.terminal_status(), None);
    }

    #[test]
    fn test_aborted_label_is_neutral() {
        assert_eq!(StreamPhase::Aborted.status_label(), "stopped");
        assert_eq!(StreamPhase::Errored.status_label(), "stream error");
    }

    #[test]
    fn test_phase_display_from_str_roundtrip() {
        for phase in [
            StreamPhase::Idle,
            StreamPhase::Sending,
            StreamPhase::Streaming,
            StreamPhase::Completed,
            StreamPhase::Aborted,
            StreamPhase::Errored,
        ] {
            let parsed: StreamPhase = phase.to_string().parse().unwrap();
            assert_eq!(parsed, phase);
        }
        assert!("paused".parse::<StreamPhase>().is_err());
    }
}
