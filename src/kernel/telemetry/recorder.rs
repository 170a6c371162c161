use std::collections::VecDeque;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, SessionSummary, TelemetrySnapshot};

/// Oldest events fall off past this many.
const DEFAULT_CAPACITY: usize = 10_000;

/// Bounded in-memory event log. Recording never fails.
#[derive(Debug)]
pub struct TelemetryRecorder {
    capacity: usize,
    dropped: u64,
    buffer: VecDeque<TelemetryEvent>,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            dropped: 0,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
            self.dropped += 1;
        }
        self.buffer.push_back(event);
    }

    pub fn events(&self) -> &VecDeque<TelemetryEvent> {
        &self.buffer
    }

    /// Events evicted to stay within capacity.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer)
    }

    /// Roll-up of the whole session, logged by the host on exit.
    pub fn summarize(&self, duration_ms: u64) -> SessionSummary {
        let snap = self.snapshot();
        SessionSummary {
            duration_ms,
            accepted: snap.speech_stats.accepted,
            played: snap.speech_stats.started,
            suppression_ratio: snap.speech_stats.suppression_ratio,
            hints_shown: snap.hint_stats.entry + snap.hint_stats.idle + snap.hint_stats.recovery,
            dialogue_steps: snap.dialogue_stats.moves + snap.dialogue_stats.navigations,
            events_dropped: self.dropped,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.dropped = 0;
    }
}
