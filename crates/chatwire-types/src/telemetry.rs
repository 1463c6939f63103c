//! Model and memory telemetry tracked alongside a session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event::MemoryStatsSnapshot;

/// Model name shown before any `meta/start` record names one.
pub const UNKNOWN_MODEL: &str = "unknown";

/// Memory-operation counters reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCounters {
    pub saved: u64,
    pub skipped_dup: u64,
    pub skipped_low: u64,
}

impl fmt::Display for MemoryCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "saved:{} dup:{} low:{}",
            self.saved, self.skipped_dup, self.skipped_low
        )
    }
}

/// Telemetry state for a session.
///
/// Persists across exchanges within one session. Only `meta` records mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
    pub model: String,
    pub memory: MemoryCounters,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            model: UNKNOWN_MODEL.to_string(),
            memory: MemoryCounters::default(),
        }
    }
}

impl Telemetry {
    /// Record the model announced by `meta/start`. A missing name resets to
    /// [`UNKNOWN_MODEL`].
    pub fn set_model(&mut self, model: Option<&str>) {
        self.model = match model {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => UNKNOWN_MODEL.to_string(),
        };
    }

    /// Optimistic increment for `meta/memory_saved`.
    ///
    /// A later `memory_stats` snapshot may overwrite the result.
    pub fn record_memory_saved(&mut self) {
        self.memory.saved = self.memory.saved.saturating_add(1);
    }

    /// Overwrite the counters with a snapshot. Absent fields keep their value.
    pub fn apply_memory_stats(&mut self, snapshot: &MemoryStatsSnapshot) {
        if let Some(saved) = snapshot.saved {
            self.memory.saved = saved;
        }
        if let Some(skipped_dup) = snapshot.skipped_dup {
            self.memory.skipped_dup = skipped_dup;
        }
        if let Some(skipped_low) = snapshot.skipped_low {
            self.memory.skipped_low = skipped_low;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(saved: u64, skipped_dup: u64, skipped_low: u64) -> MemoryCounters {
        MemoryCounters {
            saved,
            skipped_dup,
            skipped_low,
        }
    }

    #[test]
    fn test_default_telemetry() {
        let telemetry = Telemetry::default();
        assert_eq!(telemetry.model, "unknown");
        assert_eq!(telemetry.memory, counters(0, 0, 0));
    }

    #[test]
    fn test_memory_saved_then_stats_overwrites() {
        let mut telemetry = Telemetry {
            model: "m1".to_string(),
            memory: counters(2, 1, 0),
        };

        telemetry.record_memory_saved();
        assert_eq!(telemetry.memory, counters(3, 1, 0));

        telemetry.apply_memory_stats(&MemoryStatsSnapshot {
            saved: Some(10),
            skipped_dup: Some(1),
            skipped_low: Some(0),
        });
        assert_eq!(telemetry.memory, counters(10, 1, 0));
    }

    #[test]
    fn test_partial_snapshot_keeps_missing_fields() {
        let mut telemetry = Telemetry {
            model: "m1".to_string(),
            memory: counters(4, 2, 9),
        };
        telemetry.apply_memory_stats(&MemoryStatsSnapshot {
            saved: None,
            skipped_dup: Some(5),
            skipped_low: None,
        });
        assert_eq!(telemetry.memory, counters(4, 5, 9));
    }

    #[test]
    fn test_set_model_falls_back_to_unknown() {
        let mut telemetry = Telemetry::default();
        telemetry.set_model(Some("gpt-4o-mini"));
        assert_eq!(telemetry.model, "gpt-4o-mini");
        telemetry.set_model(None);
        assert_eq!(telemetry.model, UNKNOWN_MODEL);
        telemetry.set_model(Some(""));
        assert_eq!(telemetry.model, UNKNOWN_MODEL);
    }

    #[test]
    fn test_counters_display() {
        assert_eq!(counters(1, 2, 3).to_string(), "saved:1 dup:2 low:3");
    }
}
