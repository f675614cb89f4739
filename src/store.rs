use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    loader::CategoryLoader,
    resource::{Level, Resource, UnknownLevel},
    source::Source,
};

/// A level query: either every level or exactly one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelFilter {
    #[default]
    All,
    Only(Level),
}

impl LevelFilter {
    pub fn matches(self, resource: &Resource) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(level) => resource.level == level,
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LevelFilter::All => f.write_str("all"),
            LevelFilter::Only(level) => fmt::Display::fmt(level, f),
        }
    }
}

impl FromStr for LevelFilter {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(LevelFilter::All)
        } else {
            s.parse().map(LevelFilter::Only)
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        LevelFilter::Only(level)
    }
}

/// Owns the aggregated resource list. Every query hands back an owned copy,
/// so callers can never reach into the snapshot.
#[derive(Debug, Clone)]
pub struct ResourceStore {
    resources: Arc<[Resource]>,
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::from_resources(Vec::new())
    }
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_resources(resources: Vec<Resource>) -> Self {
        Self {
            resources: resources.into(),
        }
    }

    /// Replaces the whole snapshot with a fresh load of `categories`.
    pub fn load<S: Source, C: AsRef<str> + Sync>(
        &mut self,
        loader: &CategoryLoader<S>,
        categories: &[C],
    ) -> usize {
        self.resources = loader.load_all(categories).into();
        tracing::info!(count = self.resources.len(), "resource store loaded");
        self.resources.len()
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn snapshot(&self) -> Arc<[Resource]> {
        Arc::clone(&self.resources)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn all(&self) -> Vec<Resource> {
        self.resources.to_vec()
    }

    /// Resources tagged `tag`, also accepting a multi-word tag written with
    /// spaces ("machine learning" finds "machine-learning").
    pub fn filter_by_tag(&self, tag: &str) -> Vec<Resource> {
        let hyphenated = hyphenate(tag);
        self.resources
            .iter()
            .filter(|r| r.has_tag(tag) || r.has_tag(&hyphenated))
            .cloned()
            .collect()
    }

    pub fn filter_by_level(&self, level: impl Into<LevelFilter>) -> Vec<Resource> {
        let level = level.into();
        self.resources
            .iter()
            .filter(|r| level.matches(r))
            .cloned()
            .collect()
    }

    /// Narrows to one category (when given), then to one level.
    pub fn filter(&self, category: Option<&str>, level: LevelFilter) -> Vec<Resource> {
        match category {
            Some(category) => self
                .filter_by_tag(category)
                .into_iter()
                .filter(|r| level.matches(r))
                .collect(),
            None => self.filter_by_level(level),
        }
    }
}

fn hyphenate(tag: &str) -> String {
    tag.split_whitespace().collect::<Vec<_>>().join("-")
}
