//! Typed records carried by the chat stream.
//!
//! Each frame of the streamed response holds one JSON record tagged by a
//! `type` field. Records are validated once at the decode boundary; code
//! downstream of the decoder matches on these enums exhaustively.

use serde::{Deserialize, Serialize};

/// One decoded record from the chat stream.
///
/// Events carry no identifier or sequence number. Their order is the order
/// in which they appear in the byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    /// Out-of-band signal (model identity, memory bookkeeping).
    Meta(MetaEvent),

    /// An incremental fragment of assistant text. May be empty.
    Delta { text: String },

    /// An error reported by the far end. Does not end the stream by itself.
    Error { message: String },
}

/// Subtype of a `meta` record, selected by its `event` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MetaEvent {
    /// The server started generating. Carries the model name when known.
    Start {
        #[serde(default)]
        model: Option<String>,
    },

    /// One memory record was saved. Any payload is ignored.
    MemorySaved,

    /// A snapshot of the memory counters.
    MemoryStats(MemoryStatsSnapshot),
}

/// Memory counter snapshot from a `memory_stats` record.
///
/// Fields absent from the record stay `None` and leave the corresponding
/// counter untouched when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStatsSnapshot {
    #[serde(default)]
    pub saved: Option<u64>,
    #[serde(default)]
    pub skipped_dup: Option<u64>,
    #[serde(default)]
    pub skipped_low: Option<u64>,
}

impl ProtocolEvent {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolEvent::Meta(MetaEvent::Start { .. }) => "meta/start",
            ProtocolEvent::Meta(MetaEvent::MemorySaved) => "meta/memory_saved",
            ProtocolEvent::Meta(MetaEvent::MemoryStats(_)) => "meta/memory_stats",
            ProtocolEvent::Delta { .. } => "delta",
            ProtocolEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_deserialize() {
        let event: ProtocolEvent =
            serde_json::from_str(r#"{"type":"delta","text":"Hel"}"#).unwrap();
        assert_eq!(
            event,
            ProtocolEvent::Delta {
                text: "Hel".to_string()
            }
        );
    }

    #[test]
    fn test_meta_start_with_and_without_model() {
        let with: ProtocolEvent =
            serde_json::from_str(r#"{"type":"meta","event":"start","model":"m1"}"#).unwrap();
        assert_eq!(
            with,
            ProtocolEvent::Meta(MetaEvent::Start {
                model: Some("m1".to_string())
            })
        );

        let without: ProtocolEvent =
            serde_json::from_str(r#"{"type":"meta","event":"start"}"#).unwrap();
        assert_eq!(without, ProtocolEvent::Meta(MetaEvent::Start { model: None }));
    }

    #[test]
    fn test_memory_saved_ignores_payload() {
        let event: ProtocolEvent =
            serde_json::from_str(r#"{"type":"meta","event":"memory_saved","count":4}"#).unwrap();
        assert_eq!(event, ProtocolEvent::Meta(MetaEvent::MemorySaved));
    }

    #[test]
    fn test_memory_stats_partial_snapshot() {
        let event: ProtocolEvent =
            serde_json::from_str(r#"{"type":"meta","event":"memory_stats","saved":7}"#).unwrap();
        assert_eq!(
            event,
            ProtocolEvent::Meta(MetaEvent::MemoryStats(MemoryStatsSnapshot {
                saved: Some(7),
                skipped_dup: None,
                skipped_low: None,
            }))
        );
    }

    #[test]
    fn test_unknown_meta_event_rejected() {
        let result: Result<ProtocolEvent, _> =
            serde_json::from_str(r#"{"type":"meta","event":"phase","phase":"intro"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_labels() {
        let event = ProtocolEvent::Error {
            message: "boom".to_string(),
        };
        assert_eq!(event.kind(), "error");
        assert_eq!(
            ProtocolEvent::Meta(MetaEvent::MemorySaved).kind(),
            "meta/memory_saved"
        );
    }
}
