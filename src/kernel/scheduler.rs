use std::collections::HashMap;

use super::hints::HintKind;
use super::presence::Mood;
use super::time::Millis;
use crate::dialogue::content::GuideEntry;

/// Effects the host must carry out. The kernel never touches the UI directly.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    MoodChanged(Mood),
    ShowHint { kind: HintKind, text: String },
    ClearHint,
    /// Navigation intent; the host router must honor it.
    Navigate(String),
    GuideChanged { open: bool, entries: Vec<GuideEntry> },
    VoiceChanged(bool),
}

/// The named one-shot timers owned by the reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    SpeakDebounce,
    EntryHint,
    IdleHint,
    RecoveryHint,
    HintDismiss,
}

impl TimerKind {
    /// The hint tier a timer shows, if it is a hint timer.
    pub fn hint_kind(&self) -> Option<HintKind> {
        match self {
            TimerKind::EntryHint => Some(HintKind::Entry),
            TimerKind::IdleHint => Some(HintKind::Idle),
            TimerKind::RecoveryHint => Some(HintKind::Recovery),
            TimerKind::SpeakDebounce | TimerKind::HintDismiss => None,
        }
    }
}

/// Cancellable scheduled tasks. Arming an already armed timer replaces its
/// deadline; nothing fires once disarmed.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    deadlines: HashMap<TimerKind, Millis>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, kind: TimerKind, deadline: Millis) {
        self.deadlines.insert(kind, deadline);
    }

    pub fn disarm(&mut self, kind: TimerKind) -> bool {
        self.deadlines.remove(&kind).is_some()
    }

    pub fn disarm_all(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.deadlines.contains_key(&kind)
    }

    pub fn deadline(&self, kind: TimerKind) -> Option<Millis> {
        self.deadlines.get(&kind).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Removes and returns every timer whose deadline has passed, earliest
    /// first.
    pub fn take_due(&mut self, now: Millis) -> Vec<TimerKind> {
        let mut due: Vec<(Millis, TimerKind)> = self
            .deadlines
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(kind, at)| (*at, *kind))
            .collect();
        due.sort_by_key(|(at, kind)| (*at, *kind as u8));
        for (_, kind) in &due {
            self.deadlines.remove(kind);
        }
        due.into_iter().map(|(_, kind)| kind).collect()
    }
}
