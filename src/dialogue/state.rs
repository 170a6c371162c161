use serde::{Deserialize, Serialize};

use super::content::{ExperienceCategory, ProjectType};

/// Items per page in every paginated list.
pub const PAGE_SIZE: usize = 2;

/// The top-level sections offered by "View All Sections".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Skills,
    Projects,
    Journey,
    Experience,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Skills,
        Section::Projects,
        Section::Journey,
        Section::Experience,
        Section::Contact,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Journey => "Journey",
            Section::Experience => "Experience",
            Section::Contact => "Contact",
        }
    }

    pub fn overview(&self) -> DialogueState {
        match self {
            Section::Skills => DialogueState::SkillsOverview,
            Section::Projects => DialogueState::ProjectsOverview,
            Section::Journey => DialogueState::JourneyOverview,
            Section::Experience => DialogueState::ExperienceOverview,
            Section::Contact => DialogueState::ContactOverview,
        }
    }
}

/// Every screen the guided chat can show. Items are referenced by index
/// into the catalog collections (or by id where the content has one), so a
/// state is plain data: it can be stored, compared and replayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "data")]
pub enum DialogueState {
    MainMenu,
    AllSections { page: usize },

    SkillsOverview,
    CoreSkillsPreview,
    CoreSkillsList { page: usize },
    CoreSkill { index: usize },
    SkillUsage { index: usize },
    SkillConfidence { index: usize },
    SupportingSkills { page: usize },
    SupportingSkill { index: usize },
    LearningPreview,
    LearningList { page: usize },
    Learning { index: usize },

    ProjectsOverview,
    MainProject,
    ProjectList { tier: ProjectType, page: usize },
    Project { index: usize },
    ProjectTech { index: usize },
    ProjectFullTech { index: usize },
    ProjectFeatures { index: usize },
    /// `page` is absolute: page 1 holds the third and fourth features.
    ProjectMoreFeatures { index: usize, page: usize },
    ProjectLearned { index: usize },

    JourneyOverview,
    JourneyPhase { id: String },

    ExperienceOverview,
    /// One role at a time; `index` is within the category.
    ExperienceCategory { category: ExperienceCategory, index: usize },
    ExperienceDetail { category: ExperienceCategory, index: usize },

    ContactOverview,
    ContactDetail { id: String },

    /// Opened away from the home page: point back to the current route.
    NotHome { route: String },
}

impl DialogueState {
    /// Where the panel starts when opened with an empty transcript.
    pub fn entry_for(pathname: &str) -> Self {
        if pathname == "/" {
            DialogueState::MainMenu
        } else {
            DialogueState::NotHome { route: pathname.to_string() }
        }
    }
}

/// Pagination window over `len` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub start: usize,
    pub end: usize,
    pub has_more: bool,
}

impl PageWindow {
    /// Clamps `page` to the last page that exists, so a window never points
    /// past the available items.
    pub fn new(page: usize, len: usize) -> Self {
        let last_page = if len == 0 { 0 } else { (len - 1) / PAGE_SIZE };
        let page = page.min(last_page);
        let start = page * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(len);
        Self {
            page,
            start,
            end,
            has_more: (page + 1) * PAGE_SIZE < len,
        }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}
