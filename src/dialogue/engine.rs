use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::content::Catalog;
use super::menu::{render, DialogueNode, MenuAction, Transition};
use super::state::DialogueState;
use crate::error::{MascotError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub speaker: Speaker,
    pub text: String,
}

/// Result of picking an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A new bot message and action set are on screen.
    Moved(DialogueState),
    /// The host should route here. The actions on screen stay as they were.
    Navigate(String),
}

/// The chat panel: the transcript plus the state currently on screen.
pub struct DialogueEngine {
    catalog: Arc<Catalog>,
    open: bool,
    transcript: Vec<TranscriptEntry>,
    current: Option<(DialogueState, DialogueNode)>,
}

impl DialogueEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            open: false,
            transcript: Vec::new(),
            current: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn state(&self) -> Option<&DialogueState> {
        self.current.as_ref().map(|(s, _)| s)
    }

    pub fn node(&self) -> Option<&DialogueNode> {
        self.current.as_ref().map(|(_, n)| n)
    }

    pub fn actions(&self) -> &[MenuAction] {
        self.node().map(|n| n.actions.as_slice()).unwrap_or(&[])
    }

    /// Opens the panel. With an empty transcript the first node depends on
    /// the route: the main menu at home, a pointer back to the page elsewhere.
    pub fn open(&mut self, pathname: &str) {
        self.open = true;
        if self.transcript.is_empty() {
            self.show(DialogueState::entry_for(pathname));
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Returns whether the panel is open afterwards.
    pub fn toggle(&mut self, pathname: &str) -> bool {
        if self.open {
            self.close();
        } else {
            self.open(pathname);
        }
        self.open
    }

    /// Echoes the action's label as a user message, then follows it.
    pub fn select(&mut self, index: usize) -> Result<Selection> {
        if !self.open {
            return Err(MascotError::DialogueClosed);
        }
        let action = self
            .actions()
            .get(index)
            .cloned()
            .ok_or(MascotError::NoSuchAction { index, available: self.actions().len() })?;

        self.push(Speaker::User, action.label);

        match action.transition {
            Transition::Goto(state) => {
                self.show(state.clone());
                Ok(Selection::Moved(state))
            }
            Transition::Navigate(route) => {
                debug!("Dialogue navigation intent: {}", route);
                Ok(Selection::Navigate(route))
            }
        }
    }

    /// Selects the first action whose label matches exactly.
    pub fn select_label(&mut self, label: &str) -> Result<Selection> {
        let index = self
            .actions()
            .iter()
            .position(|a| a.label == label)
            .ok_or_else(|| MascotError::NoSuchLabel(label.to_string()))?;
        self.select(index)
    }

    /// Clears the transcript so the next `open` starts fresh.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.current = None;
    }

    fn show(&mut self, state: DialogueState) {
        let node = render(&state, &self.catalog);
        debug!("Dialogue -> {:?} ({} actions)", state, node.actions.len());
        self.push(Speaker::Bot, node.message.clone());
        self.current = Some((state, node));
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.transcript.push(TranscriptEntry {
            id: Uuid::new_v4(),
            speaker,
            text,
        });
    }
}
