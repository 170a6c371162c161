use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MascotError, Result};
use crate::kernel::event::Page;

/// All static collections the dialogue tree and the guide panel read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Catalog {
    pub skills: SkillsData,
    pub projects: Vec<Project>,
    pub journey: Vec<JourneyPhase>,
    pub experience: Vec<ExperienceRole>,
    pub contact: ContactData,
    /// Navigation guide entries shown when a planet is active.
    pub guide: BTreeMap<Page, Vec<GuideEntry>>,
    /// Per-page idle/recovery hint text.
    pub hints: BTreeMap<Page, PageHints>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillsData {
    pub core_capabilities: Vec<CoreSkill>,
    pub supporting_stack: Vec<String>,
    pub learning_trajectory: Vec<LearningItem>,
    pub education_sources: Vec<EducationSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSkill {
    pub name: String,
    pub summary: String,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningItem {
    pub name: String,
    pub state: String,
    pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationSource {
    pub name: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Main,
    Major,
    Minor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ProjectType,
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub live: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseState {
    Completed,
    Current,
    Future,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTitle {
    pub title: String,
    pub short_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasePreview {
    pub headline: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDetails {
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyPhase {
    pub id: String,
    pub order: u32,
    pub state: PhaseState,
    pub phase: PhaseTitle,
    pub preview: PhasePreview,
    #[serde(default)]
    pub details: Option<PhaseDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRole {
    /// Free text from the content file, e.g. "Full-time" or "Freelance".
    #[serde(rename = "type")]
    pub kind: String,
    pub role: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub tech: Vec<String>,
}

/// Experience groupings offered by the dialogue. Not mutually exclusive: a
/// freelance teaching role lands in two categories, an unusual one in none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceCategory {
    FullTime,
    Freelance,
    Teaching,
}

impl ExperienceCategory {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "full-time" => Some(Self::FullTime),
            "freelance" => Some(Self::Freelance),
            "teaching" => Some(Self::Teaching),
            _ => None,
        }
    }

    pub fn matches(&self, role: &ExperienceRole) -> bool {
        match self {
            Self::FullTime => role.kind == "Full-time",
            Self::Freelance => role.kind == "Freelance",
            Self::Teaching => role.role.to_lowercase().contains("teaching"),
        }
    }
}

/// Roles in `category`, in content order.
pub fn categorize(roles: &[ExperienceRole], category: ExperienceCategory) -> Vec<&ExperienceRole> {
    roles.iter().filter(|r| category.matches(r)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactAction {
    Mailto,
    Tel,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactChannel {
    pub id: String,
    pub label: String,
    pub value: String,
    pub action: ContactAction,
}

impl ContactChannel {
    /// Where activating the channel should take the browser.
    pub fn href(&self) -> String {
        match self.action {
            ContactAction::Mailto => format!("mailto:{}", self.value),
            ContactAction::Tel => format!("tel:{}", self.value),
            ContactAction::External => self.value.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactData {
    pub primary_actions: Vec<ContactChannel>,
    pub secondary_actions: Vec<ContactChannel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideEntry {
    pub label: String,
    pub route: String,
    /// Spoken when the entry is picked.
    pub script: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageHints {
    pub idle: Option<String>,
    pub recovery: Option<String>,
}

impl Catalog {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            "Loaded content from {}: {} projects, {} roles, {} phases",
            path.display(),
            catalog.projects.len(),
            catalog.experience.len(),
            catalog.journey.len()
        );
        Ok(catalog)
    }

    /// Rejects duplicate ids and blank display names.
    pub fn validate(&self) -> Result<()> {
        unique("project", self.projects.iter().map(|p| p.id.as_str()))?;
        unique("journey phase", self.journey.iter().map(|p| p.id.as_str()))?;
        unique(
            "contact channel",
            self.contact
                .primary_actions
                .iter()
                .chain(&self.contact.secondary_actions)
                .map(|c| c.id.as_str()),
        )?;

        if let Some(p) = self.projects.iter().find(|p| p.title.trim().is_empty()) {
            return Err(MascotError::Content(format!("project '{}' has no title", p.id)));
        }
        if self.skills.core_capabilities.iter().any(|s| s.name.trim().is_empty()) {
            return Err(MascotError::Content("core skill with empty name".to_string()));
        }
        if let Some(c) = self.contact.primary_actions.iter().find(|c| c.label.trim().is_empty()) {
            return Err(MascotError::Content(format!("contact channel '{}' has no label", c.id)));
        }
        if self.experience.iter().any(|r| r.role.trim().is_empty()) {
            return Err(MascotError::Content("experience role with empty title".to_string()));
        }
        Ok(())
    }

    /// Index of the first project typed `main`.
    pub fn main_project(&self) -> Option<usize> {
        self.projects.iter().position(|p| p.kind == ProjectType::Main)
    }

    pub fn projects_of(&self, kind: ProjectType) -> Vec<usize> {
        self.projects
            .iter()
            .enumerate()
            .filter(|(_, p)| p.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn roles_in(&self, category: ExperienceCategory) -> Vec<usize> {
        self.experience
            .iter()
            .enumerate()
            .filter(|(_, r)| category.matches(r))
            .map(|(i, _)| i)
            .collect()
    }

    /// First two projects whose tech list names the skill exactly.
    pub fn skill_usage(&self, skill_name: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.tech.iter().any(|t| t == skill_name))
            .take(2)
            .collect()
    }

    pub fn contact_channel(&self, id: &str) -> Option<&ContactChannel> {
        self.contact.primary_actions.iter().find(|c| c.id == id)
    }

    pub fn journey_phase(&self, id: &str) -> Option<&JourneyPhase> {
        self.journey.iter().find(|p| p.id == id)
    }

    pub fn guide_entries(&self, page: Page) -> &[GuideEntry] {
        self.guide.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(MascotError::Content(format!("duplicate {} id '{}'", what, id)));
        }
    }
    Ok(())
}
