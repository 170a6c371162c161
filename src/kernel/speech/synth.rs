use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SpeechConfig;
use crate::kernel::event::{UtteranceId, UtteranceRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP-47 tag, e.g. `en-GB`.
    pub lang: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceParams {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// One playback unit handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub voice: Option<Voice>,
    pub params: VoiceParams,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("speech engine rejected utterance: {0}")]
    Rejected(String),
}

/// Text-to-speech backend. Playback lifecycle is reported asynchronously as
/// `EngineSignal`s through the host's event channel.
pub trait SpeechEngine: Send {
    fn voices(&self) -> Vec<Voice>;
    fn speak(&mut self, utterance: Utterance) -> Result<(), EngineError>;
    /// Stops whatever is playing. Must be safe to call when idle.
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// The engine took it; start/end signals will follow.
    Dispatched(UtteranceId),
    /// Nothing will play. Treat as already ended.
    Finished,
}

/// Voice selection heuristic: a preferred-pattern match, then an English
/// voice, then whatever comes first.
pub fn select_voice(voices: &[Voice], config: &SpeechConfig) -> Option<Voice> {
    let name_matches = |voice: &Voice, patterns: &[String]| {
        let name = voice.name.to_lowercase();
        patterns.iter().any(|p| name.contains(&p.to_lowercase()))
    };

    voices
        .iter()
        .find(|v| name_matches(v, &config.preferred_voice_patterns))
        .or_else(|| {
            voices.iter().find(|v| {
                name_matches(v, &config.fallback_voice_patterns)
                    || v.lang.to_lowercase().starts_with("en")
            })
        })
        .or_else(|| voices.first())
        .cloned()
}

/// The speak primitive. Owns the engine handle.
pub struct Narrator {
    engine: Option<Box<dyn SpeechEngine>>,
    config: SpeechConfig,
}

impl Narrator {
    pub fn new(engine: Option<Box<dyn SpeechEngine>>, config: SpeechConfig) -> Self {
        Self { engine, config }
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.cancel();
        }
    }

    /// Cancels in-flight speech and starts `request`. Disabled voice, a
    /// missing engine, empty text and engine errors all degrade to
    /// `Finished`.
    pub fn speak(&mut self, request: &UtteranceRequest, enabled: bool) -> SpeakOutcome {
        let engine = match self.engine.as_mut() {
            Some(engine) if enabled && !request.text.is_empty() => engine,
            _ => return SpeakOutcome::Finished,
        };

        engine.cancel();

        let voice = select_voice(&engine.voices(), &self.config);
        let utterance = Utterance {
            id: request.id,
            text: request.text.clone(),
            voice,
            params: VoiceParams {
                rate: self.config.rate,
                pitch: self.config.pitch,
                volume: self.config.volume,
            },
        };
        debug!("Dispatching utterance {:?} voice={:?}", utterance.id, utterance.voice.as_ref().map(|v| &v.name));

        match engine.speak(utterance) {
            Ok(()) => SpeakOutcome::Dispatched(request.id),
            Err(e) => {
                warn!("Speech engine error: {}", e);
                SpeakOutcome::Finished
            }
        }
    }
}
