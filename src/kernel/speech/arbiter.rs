use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SpeechConfig;
use crate::kernel::event::{InteractionEvent, InteractionKind, SpeechSource, UtteranceId, UtteranceRequest};
use crate::kernel::time::Millis;

/// Why a request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuppressReason {
    EmptyText,
    AlreadySpeaking,
    /// Same text as the last accepted utterance.
    Duplicate,
    /// Too soon after the last accepted utterance began.
    Cooldown,
    /// A non-exempt source tried to talk over an active interaction.
    UserInteracting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechDecision {
    Accepted(UtteranceRequest),
    Suppressed(SuppressReason),
}

impl SpeechDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SpeechDecision::Accepted(_))
    }
}

/// The single authority over speaking state. Holds the voice flag, the
/// last-spoken memo and the in-flight utterance; nothing else mutates them.
#[derive(Debug, Clone)]
pub struct SpeechArbiter {
    config: SpeechConfig,
    voice_enabled: bool,
    is_speaking: bool,
    in_flight: Option<UtteranceId>,
    last_spoken_text: Option<String>,
    last_spoken_at: Option<Millis>,
    last_interaction: Option<InteractionEvent>,
    current: Option<UtteranceRequest>,
    seq: u64,
}

impl SpeechArbiter {
    pub fn new(config: SpeechConfig, voice_enabled: bool) -> Self {
        Self {
            config,
            voice_enabled,
            is_speaking: false,
            in_flight: None,
            last_spoken_text: None,
            last_spoken_at: None,
            last_interaction: None,
            current: None,
            seq: 0,
        }
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    pub fn in_flight(&self) -> Option<UtteranceId> {
        self.in_flight
    }

    pub fn last_spoken_text(&self) -> Option<&str> {
        self.last_spoken_text.as_deref()
    }

    pub fn last_spoken_at(&self) -> Option<Millis> {
        self.last_spoken_at
    }

    pub fn last_interaction(&self) -> Option<InteractionEvent> {
        self.last_interaction
    }

    /// The most recently accepted request, until cleared.
    pub fn current(&self) -> Option<&UtteranceRequest> {
        self.current.as_ref()
    }

    pub fn register_interaction(&mut self, kind: InteractionKind, now: Millis) {
        self.last_interaction = Some(InteractionEvent { kind, at: now });
    }

    /// Decide whether `text` may be spoken now. Accepting updates the memo;
    /// suppression leaves every field untouched.
    pub fn request_speech(&mut self, text: &str, source: SpeechSource, now: Millis) -> SpeechDecision {
        if let Some(reason) = self.suppression(text, source, now) {
            debug!("Speech suppressed ({:?}) from {:?}", reason, source);
            return SpeechDecision::Suppressed(reason);
        }

        self.seq += 1;
        let request = UtteranceRequest {
            id: UtteranceId { at: now, seq: self.seq },
            text: text.to_string(),
            source,
            timestamp: now,
        };
        self.last_spoken_text = Some(request.text.clone());
        self.last_spoken_at = Some(now);
        self.current = Some(request.clone());
        SpeechDecision::Accepted(request)
    }

    fn suppression(&self, text: &str, source: SpeechSource, now: Millis) -> Option<SuppressReason> {
        if text.trim().is_empty() {
            return Some(SuppressReason::EmptyText);
        }
        if self.is_speaking {
            return Some(SuppressReason::AlreadySpeaking);
        }
        if self.last_spoken_text.as_deref() == Some(text) {
            return Some(SuppressReason::Duplicate);
        }
        if let Some(at) = self.last_spoken_at {
            if now.since(at) < self.config.dedupe_cooldown_ms {
                return Some(SuppressReason::Cooldown);
            }
        }
        let exempt = self.config.exempt_sources.contains(&source);
        let interacting = self
            .last_interaction
            .map(|i| now.since(i.at) < self.config.interaction_grace_ms)
            .unwrap_or(false);
        if !exempt && interacting {
            return Some(SuppressReason::UserInteracting);
        }
        None
    }

    pub fn clear_speech(&mut self) {
        self.current = None;
    }

    /// The utterance was handed to the engine.
    pub fn begin(&mut self, id: UtteranceId) {
        self.in_flight = Some(id);
    }

    /// Returns false for signals about superseded utterances.
    pub fn mark_started(&mut self, id: UtteranceId) -> bool {
        if self.in_flight != Some(id) {
            return false;
        }
        self.is_speaking = true;
        true
    }

    /// End and error both land here. Returns false for stale signals.
    pub fn mark_finished(&mut self, id: UtteranceId) -> bool {
        if self.in_flight != Some(id) {
            return false;
        }
        self.in_flight = None;
        self.is_speaking = false;
        true
    }

    /// Idempotent. Returns whether anything was in flight.
    pub fn stop(&mut self) -> bool {
        let had = self.in_flight.is_some() || self.is_speaking;
        self.in_flight = None;
        self.is_speaking = false;
        had
    }

    /// Flips the voice flag and stops. Returns the new flag.
    pub fn toggle_voice(&mut self) -> bool {
        self.voice_enabled = !self.voice_enabled;
        self.stop();
        self.voice_enabled
    }
}
