use serde::{Deserialize, Serialize};

use super::content::{Catalog, ExperienceCategory, ProjectType};
use super::state::{DialogueState, PageWindow, Section, PAGE_SIZE};
use crate::error::{MascotError, Result};
use crate::kernel::event::Page;

/// Shown whenever the tree has nothing specific to say.
pub const FALLBACK_MESSAGE: &str = "That's better explored directly on the page.";

pub const MAIN_MENU_LABEL: &str = "Main Menu";
pub const BACK_LABEL: &str = "Back";

/// What selecting an action does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Replace the displayed node with this state.
    Goto(DialogueState),
    /// Ask the host router to navigate; the dialogue stays where it is.
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuAction {
    pub label: String,
    pub transition: Transition,
}

/// One bot message plus the actions offered under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub message: String,
    pub actions: Vec<MenuAction>,
}

fn goto(label: impl Into<String>, state: DialogueState) -> MenuAction {
    MenuAction { label: label.into(), transition: Transition::Goto(state) }
}

fn nav(label: impl Into<String>, page: Page) -> MenuAction {
    MenuAction { label: label.into(), transition: Transition::Navigate(page.route().to_string()) }
}

fn main_menu() -> MenuAction {
    goto(MAIN_MENU_LABEL, DialogueState::MainMenu)
}

fn back(state: DialogueState) -> MenuAction {
    goto(BACK_LABEL, state)
}

fn node(message: impl Into<String>, actions: Vec<MenuAction>) -> DialogueNode {
    DialogueNode { message: message.into(), actions }
}

fn fallback(actions: Vec<MenuAction>) -> DialogueNode {
    node(FALLBACK_MESSAGE, actions)
}

/// "a and b"
fn pair(items: &[String]) -> String {
    items.join(" and ")
}

/// Pure: the node a state renders to, given the content.
pub fn render(state: &DialogueState, catalog: &Catalog) -> DialogueNode {
    use DialogueState as S;

    match state {
        S::MainMenu => node(
            "What would you like to explore first?",
            vec![
                goto("Skills", S::SkillsOverview),
                goto("Projects", S::ProjectsOverview),
                goto("Journey", S::JourneyOverview),
                goto("Experience", S::ExperienceOverview),
                goto("Contact", S::ContactOverview),
                goto("View All Sections", S::AllSections { page: 0 }),
            ],
        ),
        S::AllSections { page } => {
            let window = PageWindow::new(*page, Section::ALL.len());
            let mut actions: Vec<MenuAction> = Section::ALL[window.range()]
                .iter()
                .map(|s| goto(s.label(), s.overview()))
                .collect();
            if window.has_more {
                actions.push(goto("View More Sections", S::AllSections { page: window.page + 1 }));
            }
            actions.push(main_menu());
            node("Here are two sections you can open.", actions)
        }

        // === Skills ===
        S::SkillsOverview => node(
            "I focus on frontend work like React and JavaScript, with backend experience using Node and Express.",
            vec![
                goto("Core Skills", S::CoreSkillsPreview),
                goto("Supporting Skills", S::SupportingSkills { page: 0 }),
                goto("Currently Learning", S::LearningPreview),
                nav("Go to Skills Page", Page::Skills),
                main_menu(),
            ],
        ),
        S::CoreSkillsPreview => {
            let core = &catalog.skills.core_capabilities;
            if core.is_empty() {
                return skills_fallback();
            }
            let mut actions: Vec<MenuAction> = core
                .iter()
                .take(PAGE_SIZE)
                .enumerate()
                .map(|(i, s)| goto(s.name.clone(), S::CoreSkill { index: i }))
                .collect();
            actions.push(goto("View All Core Skills", S::CoreSkillsList { page: 0 }));
            actions.push(back(S::SkillsOverview));
            node("Here are two of my strongest skills.", actions)
        }
        S::CoreSkillsList { page } => {
            let core = &catalog.skills.core_capabilities;
            let window = PageWindow::new(*page, core.len());
            let mut actions: Vec<MenuAction> = window
                .range()
                .map(|i| goto(core[i].name.clone(), S::CoreSkill { index: i }))
                .collect();
            if window.has_more {
                actions.push(goto("View More Core Skills", S::CoreSkillsList { page: window.page + 1 }));
            }
            actions.push(back(S::SkillsOverview));
            node("Pick a core skill to explore.", actions)
        }
        S::CoreSkill { index } => match catalog.skills.core_capabilities.get(*index) {
            None => skills_fallback(),
            Some(skill) => node(
                format!("I use {} for {}.", skill.name, skill.summary.to_lowercase()),
                vec![
                    goto("Where I used this", S::SkillUsage { index: *index }),
                    goto("Confidence level", S::SkillConfidence { index: *index }),
                    goto("Back to Core Skills", S::CoreSkillsList { page: 0 }),
                    nav("Go to Skills Page", Page::Skills),
                    main_menu(),
                ],
            ),
        },
        S::SkillUsage { index } => match catalog.skills.core_capabilities.get(*index) {
            None => skills_fallback(),
            Some(skill) => {
                let used_in = catalog.skill_usage(&skill.name);
                let message = if used_in.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    let titles: Vec<String> = used_in.iter().map(|p| p.title.clone()).collect();
                    format!("You can see {} in projects like {}.", skill.name, pair(&titles))
                };
                node(
                    message,
                    vec![
                        nav("Go to Projects Page", Page::Projects),
                        back(S::CoreSkill { index: *index }),
                        main_menu(),
                    ],
                )
            }
        },
        S::SkillConfidence { index } => match catalog.skills.core_capabilities.get(*index) {
            None => skills_fallback(),
            Some(skill) => node(
                format!("{} confidence: {}.", skill.name, skill.confidence),
                vec![
                    back(S::CoreSkill { index: *index }),
                    nav("Go to Skills Page", Page::Skills),
                    main_menu(),
                ],
            ),
        },
        S::SupportingSkills { page } => {
            let stack = &catalog.skills.supporting_stack;
            let window = PageWindow::new(*page, stack.len());
            let mut actions: Vec<MenuAction> = window
                .range()
                .map(|i| goto(stack[i].clone(), S::SupportingSkill { index: i }))
                .collect();
            if window.has_more {
                actions.push(goto(
                    "View More Supporting Skills",
                    S::SupportingSkills { page: window.page + 1 },
                ));
            }
            actions.push(back(S::SkillsOverview));
            node("Here are two supporting skills.", actions)
        }
        S::SupportingSkill { index } => match catalog.skills.supporting_stack.get(*index) {
            None => skills_fallback(),
            Some(skill) => node(
                format!("{} supports my development workflow.", skill),
                vec![
                    back(S::SupportingSkills { page: 0 }),
                    nav("Go to Skills Page", Page::Skills),
                    main_menu(),
                ],
            ),
        },
        S::LearningPreview => {
            let learning = &catalog.skills.learning_trajectory;
            let Some(first) = learning.first() else {
                return skills_fallback();
            };
            let mut actions = Vec::new();
            if learning.len() > 1 {
                actions.push(goto("View More Learning", S::LearningList { page: 0 }));
            }
            actions.push(nav("Go to Skills Page", Page::Skills));
            actions.push(back(S::SkillsOverview));
            actions.push(main_menu());
            node(format!("{} ({}) \u{2014} {}.", first.name, first.state, first.focus), actions)
        }
        S::LearningList { page } => {
            let learning = &catalog.skills.learning_trajectory;
            let window = PageWindow::new(*page, learning.len());
            let mut actions: Vec<MenuAction> = window
                .range()
                .map(|i| goto(learning[i].name.clone(), S::Learning { index: i }))
                .collect();
            if window.has_more {
                actions.push(goto("View More Learning", S::LearningList { page: window.page + 1 }));
            }
            actions.push(back(S::SkillsOverview));
            node("Here are two items I'm learning.", actions)
        }
        S::Learning { index } => match catalog.skills.learning_trajectory.get(*index) {
            None => skills_fallback(),
            Some(item) => node(
                format!("{} focuses on {}.", item.name, item.focus.to_lowercase()),
                vec![
                    back(S::SkillsOverview),
                    nav("Go to Skills Page", Page::Skills),
                    main_menu(),
                ],
            ),
        },

        // === Projects ===
        S::ProjectsOverview => node(
            "I've worked on a mix of full-stack, frontend, and system-driven projects.",
            vec![
                goto("Main Project", S::MainProject),
                goto("Major Projects", S::ProjectList { tier: ProjectType::Major, page: 0 }),
                goto("Minor Projects", S::ProjectList { tier: ProjectType::Minor, page: 0 }),
                nav("Go to Projects Page", Page::Projects),
                main_menu(),
            ],
        ),
        S::MainProject => match catalog.main_project() {
            Some(index) => render(&S::Project { index }, catalog),
            None => projects_fallback(),
        },
        S::ProjectList { tier, page } => {
            let indices = catalog.projects_of(*tier);
            let window = PageWindow::new(*page, indices.len());
            let mut actions: Vec<MenuAction> = indices[window.range()]
                .iter()
                .map(|&i| goto(catalog.projects[i].title.clone(), S::Project { index: i }))
                .collect();
            if window.has_more {
                actions.push(goto(
                    "View More Projects",
                    S::ProjectList { tier: *tier, page: window.page + 1 },
                ));
            }
            actions.push(back(S::ProjectsOverview));
            let message = match tier {
                ProjectType::Main => "Here's the project I'm proudest of.",
                ProjectType::Major => "Here are two major projects worth highlighting.",
                ProjectType::Minor => "Here are two minor projects to explore.",
            };
            node(message, actions)
        }
        S::Project { index } => match catalog.projects.get(*index) {
            None => projects_fallback(),
            Some(project) => node(
                format!("{}: {}", project.title, project.description),
                vec![
                    goto("Tech Stack", S::ProjectTech { index: *index }),
                    goto("Key Features", S::ProjectFeatures { index: *index }),
                    goto("What I learned", S::ProjectLearned { index: *index }),
                    nav("View Project Page", Page::Projects),
                    goto("Back to Projects", S::ProjectsOverview),
                    main_menu(),
                ],
            ),
        },
        S::ProjectTech { index } => match catalog.projects.get(*index) {
            None => projects_fallback(),
            Some(project) => {
                let highlights = &project.tech[..project.tech.len().min(PAGE_SIZE)];
                let message = if highlights.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    format!("Tech highlights: {}.", pair(highlights))
                };
                let mut actions = Vec::new();
                if project.tech.len() > PAGE_SIZE {
                    actions.push(goto("View Full Stack", S::ProjectFullTech { index: *index }));
                }
                actions.push(back(S::Project { index: *index }));
                node(message, actions)
            }
        },
        S::ProjectFullTech { index } => match catalog.projects.get(*index) {
            None => projects_fallback(),
            Some(project) => {
                let end = project.tech.len().min(2 * PAGE_SIZE);
                let more = project.tech.get(PAGE_SIZE..end).unwrap_or(&[]);
                let message = if more.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    format!("More stack items: {}.", pair(more))
                };
                node(
                    message,
                    vec![back(S::Project { index: *index }), nav("View Project Page", Page::Projects)],
                )
            }
        },
        S::ProjectFeatures { index } => match catalog.projects.get(*index) {
            None => projects_fallback(),
            Some(project) => {
                let first = &project.features[..project.features.len().min(PAGE_SIZE)];
                let message = if first.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    format!("Key features: {}.", pair(first))
                };
                let mut actions = Vec::new();
                if project.features.len() > PAGE_SIZE {
                    actions.push(goto(
                        "View More Features",
                        S::ProjectMoreFeatures { index: *index, page: 1 },
                    ));
                }
                actions.push(back(S::Project { index: *index }));
                node(message, actions)
            }
        },
        S::ProjectMoreFeatures { index, page } => match catalog.projects.get(*index) {
            None => projects_fallback(),
            Some(project) => {
                let window = PageWindow::new(*page, project.features.len());
                let slice = &project.features[window.range()];
                let message = if slice.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    format!("More features: {}.", pair(slice))
                };
                let mut actions = Vec::new();
                if window.has_more {
                    actions.push(goto(
                        "View More Features",
                        S::ProjectMoreFeatures { index: *index, page: window.page + 1 },
                    ));
                }
                actions.push(back(S::Project { index: *index }));
                node(message, actions)
            }
        },
        S::ProjectLearned { index } => fallback(vec![
            nav("View Project Page", Page::Projects),
            back(S::Project { index: *index }),
            main_menu(),
        ]),

        // === Journey ===
        S::JourneyOverview => node(
            "My journey shows how I moved from fundamentals to real-world systems.",
            vec![
                goto("Early Learning", S::JourneyPhase { id: "origin".to_string() }),
                goto("Transition Phase", S::JourneyPhase { id: "foundation".to_string() }),
                goto("Current Focus", S::JourneyPhase { id: "execution".to_string() }),
                nav("Go to Journey Page", Page::Journey),
                main_menu(),
            ],
        ),
        S::JourneyPhase { id } => match catalog.journey_phase(id) {
            None => fallback(vec![nav("Go to Journey Page", Page::Journey), main_menu()]),
            Some(phase) => {
                let highlights: Vec<String> = phase
                    .details
                    .as_ref()
                    .map(|d| d.highlights.iter().take(PAGE_SIZE).cloned().collect())
                    .unwrap_or_default();
                let extra = if highlights.is_empty() {
                    String::new()
                } else {
                    format!(" Highlights: {}.", pair(&highlights))
                };
                node(
                    format!(
                        "{}. {}.{}",
                        phase.preview.headline.trim_end_matches('.'),
                        phase.preview.summary.trim_end_matches('.'),
                        extra
                    ),
                    vec![
                        nav("View Full Journey", Page::Journey),
                        back(S::JourneyOverview),
                        main_menu(),
                    ],
                )
            }
        },

        // === Experience ===
        S::ExperienceOverview => node(
            "I've worked across full-time roles, freelance AI training, and teaching roles.",
            vec![
                goto(
                    "Full-Time Experience",
                    S::ExperienceCategory { category: ExperienceCategory::FullTime, index: 0 },
                ),
                goto(
                    "AI / Freelance Work",
                    S::ExperienceCategory { category: ExperienceCategory::Freelance, index: 0 },
                ),
                goto(
                    "Teaching Experience",
                    S::ExperienceCategory { category: ExperienceCategory::Teaching, index: 0 },
                ),
                nav("Go to Experience Page", Page::Experience),
                main_menu(),
            ],
        ),
        S::ExperienceCategory { category, index } => {
            let roles = catalog.roles_in(*category);
            let Some(&role_index) = roles.get(*index) else {
                return fallback(vec![
                    nav("Go to Experience Page", Page::Experience),
                    back(S::ExperienceOverview),
                ]);
            };
            let role = &catalog.experience[role_index];
            let mut actions = vec![goto(
                format!("{} \u{2013} {}", role.role, role.company),
                S::ExperienceDetail { category: *category, index: *index },
            )];
            if index + 1 < roles.len() {
                actions.push(goto(
                    "View More Roles",
                    S::ExperienceCategory { category: *category, index: index + 1 },
                ));
            }
            actions.push(back(S::ExperienceOverview));
            node("Here's one role that shaped my experience.", actions)
        }
        S::ExperienceDetail { category, index } => {
            let roles = catalog.roles_in(*category);
            match roles.get(*index) {
                None => render(&S::ExperienceOverview, catalog),
                Some(&role_index) => {
                    let role = &catalog.experience[role_index];
                    node(
                        format!("{} at {}. {}", role.role, role.company, role.description),
                        vec![
                            nav("Go to Experience Page", Page::Experience),
                            back(S::ExperienceCategory { category: *category, index: *index }),
                            main_menu(),
                        ],
                    )
                }
            }
        }

        // === Contact ===
        S::ContactOverview => node(
            "You can reach me through these channels.",
            vec![
                goto("Email", S::ContactDetail { id: "email".to_string() }),
                goto("LinkedIn", S::ContactDetail { id: "linkedin".to_string() }),
                goto("GitHub", S::ContactDetail { id: "github".to_string() }),
                nav("Open Contact Page", Page::Contact),
                main_menu(),
            ],
        ),
        S::ContactDetail { id } => match catalog.contact_channel(id) {
            None => fallback(vec![nav("Open Contact Page", Page::Contact), main_menu()]),
            Some(channel) => node(
                format!("{}: {}", channel.label, channel.value),
                vec![
                    nav("Open Contact Page", Page::Contact),
                    back(S::ContactOverview),
                    main_menu(),
                ],
            ),
        },

        S::NotHome { route } => fallback(vec![
            MenuAction {
                label: "Go to Relevant Page".to_string(),
                transition: Transition::Navigate(route.clone()),
            },
            main_menu(),
        ]),
    }
}

fn skills_fallback() -> DialogueNode {
    fallback(vec![nav("Go to Skills Page", Page::Skills), main_menu()])
}

fn projects_fallback() -> DialogueNode {
    fallback(vec![nav("Go to Projects Page", Page::Projects), main_menu()])
}

/// Pure: what picking action `index` on `state` leads to.
pub fn transition(state: &DialogueState, index: usize, catalog: &Catalog) -> Result<Transition> {
    let mut node = render(state, catalog);
    let available = node.actions.len();
    if index >= available {
        return Err(MascotError::NoSuchAction { index, available });
    }
    Ok(node.actions.swap_remove(index).transition)
}
