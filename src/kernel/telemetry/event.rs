use serde::{Deserialize, Serialize};

use crate::kernel::event::{Page, SpeechSource, UtteranceId};
use crate::kernel::hints::HintKind;
use crate::kernel::speech::arbiter::SuppressReason;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    SpeechAccepted {
        id: UtteranceId,
        source: SpeechSource,
    },

    SpeechSuppressed {
        source: SpeechSource,
        reason: SuppressReason,
    },

    UtteranceLifecycle {
        id: UtteranceId,
        event: UtteranceEventKind,
    },

    HintShown {
        page: Page,
        kind: HintKind,
    },

    DialogueTransition {
        kind: DialogueTransitionKind,
    },

    VoiceToggled {
        enabled: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtteranceEventKind {
    Dispatched,
    Started,
    Ended,
    /// Nothing played (voice off, no engine, engine error).
    Degraded,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueTransitionKind {
    Opened,
    Moved,
    Navigated,
}
