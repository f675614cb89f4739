//! Page controller for the landing page.
//!
//! Clicks on navigation links, hero buttons, learning-path cards and filter
//! buttons arrive as [`Event`]s; the controller answers with the [`Effect`]s
//! the host page should apply (scroll, retitle, render, highlight a filter).
//! Nothing here touches a DOM, so the wiring can be exercised directly.

use std::collections::HashSet;

use crate::{
    render::section_title,
    resource::{Level, Resource},
    store::{LevelFilter, ResourceStore},
};

/// How many resources the page shows before the visitor picks anything.
pub const INITIAL_DISPLAY_LIMIT: usize = 12;

/// The category "Start Learning" leads to.
pub const STARTER_CATEGORY: &str = "fundamentals";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Hero,
    About,
    LearningPaths,
    Resources,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Hero,
        Section::About,
        Section::LearningPaths,
        Section::Resources,
        Section::Contact,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::LearningPaths => "learning-paths",
            Section::Resources => "resources",
            Section::Contact => "contact",
        }
    }

    /// Resolves an in-page anchor such as `#about`.
    pub fn from_anchor(anchor: &str) -> Option<Self> {
        let id = anchor.strip_prefix('#').unwrap_or(anchor);
        Section::ALL.into_iter().find(|section| section.id() == id)
    }
}

/// Controls the page may or may not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    StartLearningButton,
    LearnMoreButton,
    ResourcesContainer,
    FilterButtons,
}

/// The sections and controls present on the page being driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    sections: HashSet<Section>,
    controls: HashSet<Control>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            sections: Section::ALL.into_iter().collect(),
            controls: [
                Control::StartLearningButton,
                Control::LearnMoreButton,
                Control::ResourcesContainer,
                Control::FilterButtons,
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl PageLayout {
    pub fn empty() -> Self {
        Self {
            sections: HashSet::new(),
            controls: HashSet::new(),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.insert(section);
        self
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.insert(control);
        self
    }

    pub fn without_section(mut self, section: Section) -> Self {
        self.sections.remove(&section);
        self
    }

    pub fn without_control(mut self, control: Control) -> Self {
        self.controls.remove(&control);
        self
    }

    pub fn has_section(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    pub fn has_control(&self, control: Control) -> bool {
        self.controls.contains(&control)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartLearning,
    LearnMore,
    /// A navigation link pointing at an in-page anchor.
    NavLink(String),
    /// A click anywhere on a learning-path card.
    PathCard(String),
    /// A click on a card's "Explore Path" link.
    PathLink(String),
    /// A filter button with its `data-filter` value.
    Filter(String),
    /// Initial resources finished loading.
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScrollTo(Section),
    SetHeading(String),
    SetActiveFilter(LevelFilter),
    Render(Vec<Resource>),
}

pub struct Page {
    store: ResourceStore,
    layout: PageLayout,
    active_filter: LevelFilter,
    current_category: Option<String>,
    queries: usize,
}

impl Page {
    pub fn new(store: ResourceStore, layout: PageLayout) -> Self {
        Self {
            store,
            layout,
            active_filter: LevelFilter::All,
            current_category: None,
            queries: 0,
        }
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    /// Swaps in a freshly loaded store.
    pub fn replace_store(&mut self, store: ResourceStore) {
        self.store = store;
    }

    /// The one highlighted filter button.
    pub fn active_filter(&self) -> LevelFilter {
        self.active_filter
    }

    pub fn current_category(&self) -> Option<&str> {
        self.current_category.as_deref()
    }

    /// Store queries issued so far.
    pub fn query_count(&self) -> usize {
        self.queries
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            Event::StartLearning => {
                if !self.layout.has_control(Control::StartLearningButton) {
                    tracing::warn!("start learning button not found");
                    return effects;
                }
                if self.scroll_to(Section::LearningPaths, &mut effects)
                    && self.scroll_to(Section::Resources, &mut effects)
                {
                    self.show_category(STARTER_CATEGORY, &mut effects);
                }
            }
            Event::LearnMore => {
                if !self.layout.has_control(Control::LearnMoreButton) {
                    tracing::warn!("learn more button not found");
                    return effects;
                }
                self.scroll_to(Section::About, &mut effects);
            }
            Event::NavLink(anchor) => match Section::from_anchor(&anchor) {
                Some(section) => {
                    self.scroll_to(section, &mut effects);
                }
                None => tracing::warn!(anchor = %anchor, "navigation link points at no section"),
            },
            Event::PathCard(category) | Event::PathLink(category) => {
                if category.trim().is_empty() {
                    tracing::warn!("path control missing its category");
                    return effects;
                }
                if self.scroll_to(Section::Resources, &mut effects) {
                    self.show_category(&category, &mut effects);
                }
            }
            Event::Filter(value) => match value.parse::<LevelFilter>() {
                Ok(filter) => self.apply_filter(filter, &mut effects),
                Err(e) => tracing::warn!(error = %e, "ignoring filter button"),
            },
            Event::Loaded => self.show_initial(&mut effects),
        }
        effects
    }

    fn scroll_to(&self, section: Section, effects: &mut Vec<Effect>) -> bool {
        if self.layout.has_section(section) {
            tracing::debug!(section = section.id(), "scrolling");
            effects.push(Effect::ScrollTo(section));
            true
        } else {
            tracing::warn!(section = section.id(), "section not found");
            false
        }
    }

    fn query(&mut self, category: Option<&str>, filter: LevelFilter) -> Vec<Resource> {
        self.queries += 1;
        self.store.filter(category, filter)
    }

    fn render(&self, resources: Vec<Resource>, effects: &mut Vec<Effect>) {
        if self.layout.has_control(Control::ResourcesContainer) {
            effects.push(Effect::Render(resources));
        } else {
            tracing::warn!("resources container not found");
        }
    }

    fn set_active(&mut self, filter: LevelFilter, effects: &mut Vec<Effect>) {
        self.active_filter = filter;
        if self.layout.has_control(Control::FilterButtons) {
            effects.push(Effect::SetActiveFilter(filter));
        }
    }

    fn show_category(&mut self, category: &str, effects: &mut Vec<Effect>) {
        tracing::info!(category, "showing category");
        self.current_category = Some(category.to_string());
        effects.push(Effect::SetHeading(section_title(category)));
        self.set_active(LevelFilter::All, effects);

        let resources = self.query(Some(category), LevelFilter::All);
        if resources.is_empty() {
            tracing::warn!(category, "no resources for category");
        }
        self.render(resources, effects);
    }

    fn apply_filter(&mut self, filter: LevelFilter, effects: &mut Vec<Effect>) {
        if !self.layout.has_control(Control::FilterButtons) {
            tracing::warn!("filter buttons not found");
            return;
        }
        self.set_active(filter, effects);

        let category = self.current_category.clone();
        if let Some(category) = &category {
            let heading = match filter {
                LevelFilter::All => section_title(category),
                LevelFilter::Only(level) => {
                    format!("{} {}", capitalize(level), section_title(category))
                }
            };
            effects.push(Effect::SetHeading(heading));
        }

        let resources = self.query(category.as_deref(), filter);
        let resources = match category {
            Some(_) => resources,
            None => resources.into_iter().take(INITIAL_DISPLAY_LIMIT).collect(),
        };
        self.render(resources, effects);
    }

    fn show_initial(&mut self, effects: &mut Vec<Effect>) {
        if self.store.is_empty() {
            tracing::error!("no resources loaded, showing built-in samples");
            self.store = ResourceStore::from_resources(fallback_resources());
        }
        let resources = self
            .query(None, LevelFilter::All)
            .into_iter()
            .take(INITIAL_DISPLAY_LIMIT)
            .collect();
        self.render(resources, effects);
    }
}

fn capitalize(level: Level) -> String {
    let level = level.as_str();
    format!("{}{}", &level[..1].to_uppercase(), &level[1..])
}

/// Shown when no category document could be loaded at all.
pub fn fallback_resources() -> Vec<Resource> {
    vec![
        Resource::new(
            "Introduction to AI",
            "https://example.com/intro-ai",
            "A beginner-friendly introduction to artificial intelligence",
            "Fundamentals",
            "",
            Level::Beginner,
        ),
        Resource::new(
            "Machine Learning Basics",
            "https://example.com/ml-basics",
            "Learn the fundamentals of machine learning",
            "Machine Learning",
            "",
            Level::Beginner,
        ),
        Resource::new(
            "Neural Networks Explained",
            "https://example.com/neural-networks",
            "Understanding how neural networks work",
            "Deep Learning",
            "",
            Level::Intermediate,
        ),
    ]
}
