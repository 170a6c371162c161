use serde::{Deserialize, Serialize};

/// What the mascot's face shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    /// Blinking, nothing queued.
    #[default]
    Idle,
    /// A request was accepted and is waiting out the debounce.
    Thinking,
    /// The engine reported that playback started.
    Speaking,
}

/// Requests that may move the mood. The graph decides whether they do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodRequest {
    SpeechAccepted,
    PlaybackStarted,
    PlaybackEnded,
    Stopped,
    VoiceDisabled,
}

pub struct MoodGraph;

impl MoodGraph {
    /// Pure function: (Current Mood, Request) -> New Mood
    /// Returns None if the transition is invalid/ignored.
    pub fn transition(current: Mood, request: MoodRequest) -> Option<Mood> {
        use Mood::*;
        use MoodRequest::*;

        match (current, request) {
            // A newer request preempts whatever is playing.
            (Idle, SpeechAccepted) | (Speaking, SpeechAccepted) => Some(Thinking),

            (Thinking, PlaybackStarted) => Some(Speaking),

            (Thinking, PlaybackEnded) | (Speaking, PlaybackEnded) => Some(Idle),
            (Thinking, Stopped) | (Speaking, Stopped) => Some(Idle),
            (Thinking, VoiceDisabled) | (Speaking, VoiceDisabled) => Some(Idle),

            _ => None,
        }
    }
}
