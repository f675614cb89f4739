use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categories published by the resource hub, in display order.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "fundamentals",
    "machine-learning",
    "deep-learning",
    "nlp",
    "computer-vision",
    "reinforcement-learning",
    "ai-ethics",
    "ai-applications",
];

pub const DEFAULT_SOURCE: &str = "resources";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found '{}'", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Settings read from a YAML file; command line arguments win over these.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Directory or base URL holding `<category>.md` documents.
    pub source: Option<String>,
    pub categories: Option<Vec<String>>,
    pub output: Option<PathBuf>,
    pub level: Option<String>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub cache: bool,
}

impl ConfigFile {
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_SOURCE)
    }

    pub fn categories(&self) -> Vec<String> {
        match &self.categories {
            Some(categories) => categories.clone(),
            None => DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound && allow_missing => Ok(ConfigFile::default()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_all_fields() {
        let config = parse_config(indoc! {"
            source: https://example.com/resources
            categories:
              - nlp
              - ai-ethics
            output: site/index.html
            level: beginner
            limit: 5
            cache: true
        "})
        .unwrap();

        assert_eq!(
            ConfigFile {
                source: Some("https://example.com/resources".to_string()),
                categories: Some(vec!["nlp".to_string(), "ai-ethics".to_string()]),
                output: Some(PathBuf::from("site/index.html")),
                level: Some("beginner".to_string()),
                limit: Some(5),
                cache: true,
            },
            config
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(DEFAULT_SOURCE, config.source());
        assert_eq!(DEFAULT_CATEGORIES.to_vec(), config.categories());
        assert!(!config.cache);
    }

    #[test]
    fn unknown_shape_is_a_parse_error() {
        assert!(parse_config("categories: 12").is_err());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reshub.yml");

        assert_eq!(ConfigFile::default(), load_config(&path, true).unwrap());
        assert!(matches!(
            load_config(&path, false),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reshub.yml");
        std::fs::write(&path, "source: ./docs\n").unwrap();

        assert_eq!("./docs", load_config(&path, false).unwrap().source());
    }
}
