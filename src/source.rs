use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::resource::normalize_tag;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[cfg(feature = "http")]
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to fetch {url}: {status}")]
    Status { url: String, status: u16 },
    #[error("invalid source url {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Where category documents come from.
pub trait Source: Send + Sync {
    fn fetch(&self, category: &str) -> Result<String, FetchError>;

    /// Human readable location of `category`, used in log lines.
    fn location(&self, category: &str) -> String;
}

/// The file name a category document is published under.
pub fn category_file_name(category: &str) -> String {
    format!("{}.md", normalize_tag(category))
}

/// Reads `<root>/<category-slug>.md` from disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

fn is_visible(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |s| !s.starts_with('.'))
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, category: &str) -> PathBuf {
        self.root.join(category_file_name(category))
    }

    /// Lists the categories published under the root, sorted by name.
    pub fn discover(&self) -> Vec<String> {
        let mut categories: Vec<String> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_entry(is_visible)
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().unwrap_or_default() == "md")
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        categories.sort();
        categories
    }
}

impl Source for DirSource {
    fn fetch(&self, category: &str) -> Result<String, FetchError> {
        let path = self.path_for(category);
        fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source })
    }

    fn location(&self, category: &str) -> String {
        self.path_for(category).display().to_string()
    }
}

/// Fetches `<base>/<category-slug>.md` over HTTP.
#[cfg(feature = "http")]
pub struct HttpSource {
    base: url::Url,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let invalid = |message: String| FetchError::InvalidUrl {
            url: base.to_string(),
            message,
        };

        // without the trailing slash `join` would replace the last segment
        let mut base = url::Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        if base.cannot_be_a_base() {
            return Err(invalid("cannot be used as a base url".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|source| FetchError::Http {
                url: base.to_string(),
                source,
            })?;

        Ok(Self { base, client })
    }

    fn url_for(&self, category: &str) -> Result<url::Url, FetchError> {
        self.base
            .join(&category_file_name(category))
            .map_err(|e| FetchError::InvalidUrl {
                url: self.base.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(feature = "http")]
impl Source for HttpSource {
    fn fetch(&self, category: &str) -> Result<String, FetchError> {
        let url = self.url_for(category)?;
        let http_error = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url.clone()).send().map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(http_error)
    }

    fn location(&self, category: &str) -> String {
        self.url_for(category)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| category_file_name(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn file_name_is_slugged() {
        assert_eq!("machine-learning.md", category_file_name("Machine Learning"));
        assert_eq!("nlp.md", category_file_name("nlp"));
    }

    #[test]
    fn dir_source_reads_and_discovers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("nlp.md"), "# NLP\n").unwrap();
        fs::write(dir.path().join("ai-ethics.md"), "# AI Ethics\n").unwrap();
        fs::write(dir.path().join(".draft.md"), "hidden").unwrap();
        fs::write(dir.path().join("notes.txt"), "not markdown").unwrap();

        let source = DirSource::new(dir.path());

        assert_eq!(vec!["ai-ethics", "nlp"], source.discover());
        assert_eq!("# NLP\n", source.fetch("nlp").unwrap());
        assert_eq!("# AI Ethics\n", source.fetch("AI Ethics").unwrap());
    }

    #[test]
    fn dir_source_missing_category_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path());

        assert!(matches!(
            source.fetch("missing"),
            Err(FetchError::Io { .. })
        ));
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_source_joins_category_file() {
        let source = HttpSource::new("https://example.com/site/resources").unwrap();
        assert_eq!(
            "https://example.com/site/resources/deep-learning.md",
            source.location("deep learning")
        );
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_source_rejects_bad_base() {
        assert!(matches!(
            HttpSource::new("not a url"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }
}
