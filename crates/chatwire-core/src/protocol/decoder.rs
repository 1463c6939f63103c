//! Frame payload to [`ProtocolEvent`] decoder.
//!
//! Payloads that are not JSON, carry an unknown `type` or `event`, or lack a
//! field their type requires are transport noise: they are dropped without
//! surfacing an error. Nothing here ever fails.

use chatwire_types::event::ProtocolEvent;

use crate::sse::Frame;

/// Decode one frame payload. Returns `None` for anything malformed.
pub fn decode_event(payload: &str) -> Option<ProtocolEvent> {
    match serde_json::from_str::<ProtocolEvent>(payload) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::trace!(error = %err, payload_len = payload.len(), "discarding malformed frame");
            None
        }
    }
}

/// Decode the payload carried by a [`Frame`].
pub fn decode_frame(frame: &Frame) -> Option<ProtocolEvent> {
    decode_event(&frame.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwire_types::event::{MemoryStatsSnapshot, MetaEvent};

    #[test]
    fn test_decode_delta_verbatim() {
        assert_eq!(
            decode_event(r#"{"type":"delta","text":"  spaced "}"#),
            Some(ProtocolEvent::Delta {
                text: "  spaced ".to_string()
            })
        );
    }

    #[test]
    fn test_decode_empty_delta() {
        assert_eq!(
            decode_event(r#"{"type":"delta","text":""}"#),
            Some(ProtocolEvent::Delta {
                text: String::new()
            })
        );
    }

    #[test]
    fn test_decode_error_event() {
        assert_eq!(
            decode_event(r#"{"type":"error","message":"upstream timeout"}"#),
            Some(ProtocolEvent::Error {
                message: "upstream timeout".to_string()
            })
        );
    }

    #[test]
    fn test_decode_memory_stats() {
        assert_eq!(
            decode_event(
                r#"{"type":"meta","event":"memory_stats","saved":10,"skipped_dup":1,"skipped_low":0}"#
            ),
            Some(ProtocolEvent::Meta(MetaEvent::MemoryStats(
                MemoryStatsSnapshot {
                    saved: Some(10),
                    skipped_dup: Some(1),
                    skipped_low: Some(0),
                }
            )))
        );
    }

    #[test]
    fn test_decode_multiline_payload() {
        let frame = Frame {
            data: "{\"type\":\"delta\",\n\"text\":\"Hel\"}".to_string(),
        };
        assert_eq!(
            decode_frame(&frame),
            Some(ProtocolEvent::Delta {
                text: "Hel".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_payloads_discarded() {
        let cases = [
            "not json",
            "",
            "42",
            r#"{"type":"unknown"}"#,
            r#"{"type":"meta"}"#,
            r#"{"type":"meta","event":"phase","phase":"guide"}"#,
            r#"{"type":"meta","event":"memory_stats","saved":-1}"#,
            r#"{"type":"delta"}"#,
            r#"{"type":"delta","text":null}"#,
            r#"{"type":"error"}"#,
            r#"{"text":"no type"}"#,
            r#"{"type":"delta","text":"cut"#,
        ];
        for payload in cases {
            assert_eq!(decode_event(payload), None, "payload {payload:?}");
        }
    }
}
