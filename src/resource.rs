use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Lowercases `s` and joins its words with hyphens, so "Machine Learning"
/// and "machine-learning" name the same tag.
pub fn normalize_tag(s: &str) -> String {
    WHITESPACE_RUN
        .replace_all(s.trim(), "-")
        .to_lowercase()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Sniffs a section heading for a skill level.
    ///
    /// "beginner" is checked before "advanced", anything else is intermediate.
    pub fn from_heading(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("beginner") {
            Level::Beginner
        } else if text.contains("advanced") {
            Level::Advanced
        } else {
            Level::Intermediate
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown level '{}', expected beginner, intermediate or advanced",
            self.0
        )
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

/// One learning-material entry parsed out of a category document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub level: Level,
    pub tags: Vec<String>,
}

impl Resource {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        level: Level,
    ) -> Self {
        let category = category.into();
        let tags = vec![level.to_string(), normalize_tag(&category)];
        Self {
            title: title.into(),
            url: url.into(),
            description: description.into(),
            category,
            subcategory: subcategory.into(),
            level,
            tags,
        }
    }

    /// The text shown on a card: the description, or the subcategory when
    /// the entry had none.
    pub fn display_description(&self) -> &str {
        if self.description.is_empty() {
            &self.subcategory
        } else {
            &self.description
        }
    }

    /// The normalized category tag, used to pick the card image.
    pub fn category_tag(&self) -> Option<&str> {
        self.tags.get(1).map(String::as_str).filter(|t| !t.is_empty())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
