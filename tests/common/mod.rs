#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use mascot::dialogue::content::{
    Catalog, ContactAction, ContactChannel, CoreSkill, ExperienceRole, GuideEntry, LearningItem,
    PhaseDetails, PhasePreview, PhaseState, PhaseTitle, JourneyPhase, Project, ProjectType,
};
use mascot::kernel::event::{Page, Viewport};
use mascot::kernel::speech::synth::{EngineError, SpeechEngine, Utterance, Voice};
use mascot::storage::MemoryFlagStore;
use mascot::{MascotConfig, Reactor};

#[derive(Debug, Default)]
pub struct EngineLog {
    pub spoken: Vec<Utterance>,
    pub cancels: usize,
}

/// Records every call. Lifecycle signals are injected by the test.
pub struct RecordingEngine {
    pub log: Arc<Mutex<EngineLog>>,
    pub voices: Vec<Voice>,
    pub fail: bool,
}

impl RecordingEngine {
    pub fn new() -> (Self, Arc<Mutex<EngineLog>>) {
        let log = Arc::new(Mutex::new(EngineLog::default()));
        let engine = Self {
            log: log.clone(),
            voices: vec![
                Voice { name: "Alex".to_string(), lang: "en-US".to_string() },
                Voice { name: "Samantha".to_string(), lang: "en-US".to_string() },
            ],
            fail: false,
        };
        (engine, log)
    }
}

impl SpeechEngine for RecordingEngine {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) -> Result<(), EngineError> {
        if self.fail {
            return Err(EngineError::Rejected("test failure".to_string()));
        }
        self.log.lock().unwrap().spoken.push(utterance);
        Ok(())
    }

    fn cancel(&mut self) {
        self.log.lock().unwrap().cancels += 1;
    }
}

pub fn spoken_count(log: &Arc<Mutex<EngineLog>>) -> usize {
    log.lock().unwrap().spoken.len()
}

pub fn project(id: &str, kind: ProjectType, tech: &[&str], features: &[&str]) -> Project {
    Project {
        id: id.to_string(),
        title: format!("{} title", id),
        kind,
        description: format!("{} description", id),
        tech: tech.iter().map(|s| s.to_string()).collect(),
        features: features.iter().map(|s| s.to_string()).collect(),
        github: None,
        live: None,
    }
}

pub fn role(kind: &str, title: &str, company: &str) -> ExperienceRole {
    ExperienceRole {
        kind: kind.to_string(),
        role: title.to_string(),
        company: company.to_string(),
        description: format!("Worked at {}.", company),
        outcome: None,
        responsibilities: Vec::new(),
        tech: Vec::new(),
    }
}

pub fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::default();
    catalog.skills.core_capabilities = ["React", "JavaScript", "Node.js"]
        .iter()
        .map(|n| CoreSkill {
            name: n.to_string(),
            summary: format!("Building With {}", n),
            confidence: "High".to_string(),
        })
        .collect();
    catalog.skills.supporting_stack = vec!["Git".to_string(), "Vite".to_string(), "Figma".to_string()];
    catalog.skills.learning_trajectory = vec![
        LearningItem { name: "TypeScript".into(), state: "active".into(), focus: "Typing React".into() },
        LearningItem { name: "Docker".into(), state: "next".into(), focus: "Containers".into() },
    ];
    catalog.projects = vec![
        project("main", ProjectType::Main, &["React", "Vite", "Tailwind", "Framer", "Node.js"], &["a", "b", "c", "d", "e"]),
        project("major-1", ProjectType::Major, &["React", "Node.js"], &["x", "y"]),
        project("major-2", ProjectType::Major, &["JavaScript"], &["x"]),
        project("major-3", ProjectType::Major, &["React"], &[]),
        project("minor-1", ProjectType::Minor, &[], &["tiny"]),
    ];
    catalog.journey = vec![JourneyPhase {
        id: "origin".to_string(),
        order: 1,
        state: PhaseState::Completed,
        phase: PhaseTitle { title: "Exploration".into(), short_label: "Origin".into() },
        preview: PhasePreview {
            headline: "Learning how things work".into(),
            summary: "Early exploration into problem-solving.".into(),
        },
        details: Some(PhaseDetails {
            description: "desc".into(),
            highlights: vec!["Exploration mindset".into(), "Research".into(), "Goals".into()],
        }),
    }];
    catalog.experience = vec![
        role("Full-time", "Frontend Developer", "Acme"),
        role("Freelance", "AI Trainer", "Remote"),
        role("Part-time", "Teaching Assistant", "College"),
    ];
    catalog.contact.primary_actions = vec![
        ContactChannel {
            id: "email".to_string(),
            label: "Email".to_string(),
            value: "x@y.com".to_string(),
            action: ContactAction::Mailto,
        },
        ContactChannel {
            id: "github".to_string(),
            label: "GitHub".to_string(),
            value: "https://github.com/x".to_string(),
            action: ContactAction::External,
        },
    ];
    catalog.guide.insert(
        Page::Home,
        vec![
            GuideEntry { label: "Skills".into(), route: "/skills".into(), script: "To the skills planet.".into() },
            GuideEntry { label: "Projects".into(), route: "/projects".into(), script: "To the projects.".into() },
            GuideEntry { label: "Journey".into(), route: "/journey".into(), script: "The journey.".into() },
            GuideEntry { label: "Contact".into(), route: "/contact".into(), script: "Say hello.".into() },
        ],
    );
    catalog
}

pub fn reactor_with(viewport: Viewport) -> (Reactor, Arc<Mutex<EngineLog>>) {
    let (engine, log) = RecordingEngine::new();
    let reactor = Reactor::new(
        MascotConfig::default(),
        Arc::new(sample_catalog()),
        Some(Box::new(engine)),
        Box::new(MemoryFlagStore::new()),
        viewport,
    );
    (reactor, log)
}

/// Desktop reactor, voice on by default.
pub fn reactor() -> (Reactor, Arc<Mutex<EngineLog>>) {
    reactor_with(Viewport::Desktop)
}
