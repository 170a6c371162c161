use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::time::Millis;

/// The content pages the host router knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Skills,
    Projects,
    Journey,
    Experience,
    Contact,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::Skills,
        Page::Projects,
        Page::Journey,
        Page::Experience,
        Page::Contact,
    ];

    pub fn route(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Skills => "/skills",
            Page::Projects => "/projects",
            Page::Journey => "/journey",
            Page::Experience => "/experience",
            Page::Contact => "/contact",
        }
    }

    /// `None` for paths the router renders as not-found.
    pub fn from_route(path: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.route() == path)
    }

    pub fn key(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Skills => "skills",
            Page::Projects => "projects",
            Page::Journey => "journey",
            Page::Experience => "experience",
            Page::Contact => "contact",
        }
    }

    /// One-line narration offered when the page is first visited.
    pub fn narration(&self) -> &'static str {
        match self {
            Page::Home => "Welcome. You can explore my skills, projects, journey, and experience.",
            Page::Skills => "This section highlights my core skills and learning path.",
            Page::Projects => "Here are the projects I've built. Select one to hear more.",
            Page::Journey => "This section represents my professional journey.",
            Page::Experience => "Here's my real-world experience and roles. Thank you.",
            Page::Contact => "Here are the best ways to contact me.",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Mobile,
    #[default]
    Desktop,
}

/// What triggered a speech request. Drives the suppression policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechSource {
    Manual,
    Page,
    Guide,
    Navigation,
    Action,
    Planet,
    Projects,
    Experience,
    Skills,
    Journey,
    Contact,
}

impl SpeechSource {
    /// Sources that may speak while the user is actively interacting.
    pub fn interaction_exempt() -> BTreeSet<SpeechSource> {
        use SpeechSource::*;
        [Action, Planet, Projects, Experience, Skills, Journey, Contact, Navigation]
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Route,
    Planet,
    Skills,
    Projects,
    Experience,
    Journey,
    Contact,
    Guide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    pub at: Millis,
}

/// Identity of one accepted utterance. Distinct for every acceptance, even
/// when the text repeats after the cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtteranceId {
    pub at: Millis,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    pub id: UtteranceId,
    pub text: String,
    pub source: SpeechSource,
    pub timestamp: Millis,
}

/// Lifecycle reports from the speech engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    Started(UtteranceId),
    Ended(UtteranceId),
    Failed(UtteranceId),
}

/// Everything the host feeds into the reactor.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Router navigated to a path.
    RouteChanged(String),
    Interaction(InteractionKind),
    SpeechRequested { text: String, source: SpeechSource },
    /// Narrate a page, once per page.
    PageSpeechRequested { page: Page, text: String },
    Engine(EngineSignal),
    StopSpeech,
    ClearSpeech,
    ToggleVoice,
    /// The mascot itself was clicked: registers a guide interaction and
    /// toggles the guide panel.
    MascotClicked,
    ToggleGuide,
    SetGuideOpen(bool),
    /// Index into the currently listed guide entries.
    GuideSelected(usize),
    PlanetFocused(Option<Page>),
    ViewportChanged(Viewport),
}
