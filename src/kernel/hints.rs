use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::{Page, Viewport};
use crate::dialogue::content::PageHints;

const DEFAULT_IDLE_HINT: &str = "Tap a planet to continue.";
const DEFAULT_RECOVERY_HINT: &str = "Double-tap a planet to navigate.";

/// Escalating tiers of unsolicited guidance tied to dwell time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintKind {
    Entry,
    Idle,
    Recovery,
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HintKind::Entry => "entry",
            HintKind::Idle => "idle",
            HintKind::Recovery => "recovery",
        })
    }
}

/// Hint text per page and tier.
#[derive(Debug, Clone, Default)]
pub struct HintCatalog {
    overrides: BTreeMap<Page, PageHints>,
}

impl HintCatalog {
    pub fn new(overrides: BTreeMap<Page, PageHints>) -> Self {
        Self { overrides }
    }

    pub fn text(&self, page: Page, kind: HintKind) -> String {
        let custom = self.overrides.get(&page);
        match kind {
            HintKind::Entry => entry_hint(page).to_string(),
            HintKind::Idle => custom
                .and_then(|h| h.idle.clone())
                .unwrap_or_else(|| DEFAULT_IDLE_HINT.to_string()),
            HintKind::Recovery => custom
                .and_then(|h| h.recovery.clone())
                .unwrap_or_else(|| DEFAULT_RECOVERY_HINT.to_string()),
        }
    }
}

fn entry_hint(page: Page) -> &'static str {
    match page {
        Page::Home => "Explore the planets to begin.",
        Page::Skills => "Browse skills and learning paths.",
        Page::Projects => "Open a project to learn more.",
        Page::Journey => "Scroll to see journey phases.",
        Page::Experience => "Select a role to hear details.",
        Page::Contact => "Pick a contact method here.",
    }
}

/// Which hints were already shown this session. Each `page:tier` key is
/// shown at most once.
#[derive(Debug, Clone, Default)]
pub struct HintLedger {
    shown: HashSet<String>,
}

impl HintLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(page: Page, kind: HintKind) -> String {
        format!("{}:{}", page, kind)
    }

    pub fn has_shown(&self, page: Page, kind: HintKind) -> bool {
        self.shown.contains(&Self::key(page, kind))
    }

    /// Records the hint. Returns false if it had already been shown.
    pub fn mark_shown(&mut self, page: Page, kind: HintKind) -> bool {
        self.shown.insert(Self::key(page, kind))
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

/// Small screens only get the first few words.
pub fn normalize_hint(text: &str, viewport: Viewport, max_words: usize) -> String {
    match viewport {
        Viewport::Desktop => text.to_string(),
        Viewport::Mobile => text.split(' ').take(max_words).collect::<Vec<_>>().join(" "),
    }
}
