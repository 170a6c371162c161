use std::collections::VecDeque;

use super::event::{DialogueTransitionKind, TelemetryEvent, UtteranceEventKind};
use crate::kernel::hints::HintKind;
use crate::kernel::speech::arbiter::SuppressReason;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub speech_stats: SpeechStats,
    pub hint_stats: HintStats,
    pub dialogue_stats: DialogueStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeechStats {
    pub accepted: u64,
    pub suppressed_empty: u64,
    pub suppressed_speaking: u64,
    pub suppressed_duplicate: u64,
    pub suppressed_cooldown: u64,
    pub suppressed_interaction: u64,
    pub dispatched: u64,
    pub started: u64,
    pub ended: u64,
    pub degraded: u64,
    pub canceled: u64,
    /// suppressed / (accepted + suppressed)
    pub suppression_ratio: f64,
}

impl SpeechStats {
    pub fn suppressed(&self) -> u64 {
        self.suppressed_empty
            + self.suppressed_speaking
            + self.suppressed_duplicate
            + self.suppressed_cooldown
            + self.suppressed_interaction
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HintStats {
    pub entry: u64,
    pub idle: u64,
    pub recovery: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogueStats {
    pub opened: u64,
    pub moves: u64,
    pub navigations: u64,
}

/// One line per session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub duration_ms: u64,
    pub accepted: u64,
    /// Utterances the engine reported as started.
    pub played: u64,
    pub suppression_ratio: f64,
    pub hints_shown: u64,
    pub dialogue_steps: u64,
    pub events_dropped: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::SpeechAccepted { .. } => snap.speech_stats.accepted += 1,
            TelemetryEvent::SpeechSuppressed { reason, .. } => {
                let s = &mut snap.speech_stats;
                match reason {
                    SuppressReason::EmptyText => s.suppressed_empty += 1,
                    SuppressReason::AlreadySpeaking => s.suppressed_speaking += 1,
                    SuppressReason::Duplicate => s.suppressed_duplicate += 1,
                    SuppressReason::Cooldown => s.suppressed_cooldown += 1,
                    SuppressReason::UserInteracting => s.suppressed_interaction += 1,
                }
            }
            TelemetryEvent::UtteranceLifecycle { event, .. } => {
                let s = &mut snap.speech_stats;
                match event {
                    UtteranceEventKind::Dispatched => s.dispatched += 1,
                    UtteranceEventKind::Started => s.started += 1,
                    UtteranceEventKind::Ended => s.ended += 1,
                    UtteranceEventKind::Degraded => s.degraded += 1,
                    UtteranceEventKind::Canceled => s.canceled += 1,
                }
            }
            TelemetryEvent::HintShown { kind, .. } => match kind {
                HintKind::Entry => snap.hint_stats.entry += 1,
                HintKind::Idle => snap.hint_stats.idle += 1,
                HintKind::Recovery => snap.hint_stats.recovery += 1,
            },
            TelemetryEvent::DialogueTransition { kind } => match kind {
                DialogueTransitionKind::Opened => snap.dialogue_stats.opened += 1,
                DialogueTransitionKind::Moved => snap.dialogue_stats.moves += 1,
                DialogueTransitionKind::Navigated => snap.dialogue_stats.navigations += 1,
            },
            TelemetryEvent::VoiceToggled { .. } => {}
        }
    }

    let suppressed = snap.speech_stats.suppressed();
    let total = snap.speech_stats.accepted + suppressed;
    if total > 0 {
        snap.speech_stats.suppression_ratio = suppressed as f64 / total as f64;
    }

    snap
}
