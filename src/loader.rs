use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use rayon::prelude::*;

use crate::{
    parser::parse_resources,
    resource::Resource,
    source::{FetchError, Source},
};

/// Parsed resources per category, kept for the whole session once a
/// category has loaded successfully.
#[derive(Debug, Default)]
pub struct CategoryCache {
    entries: Mutex<HashMap<String, Arc<[Resource]>>>,
}

impl CategoryCache {
    pub fn get(&self, category: &str) -> Option<Arc<[Resource]>> {
        self.lock().get(category).cloned()
    }

    pub fn insert(&self, category: &str, resources: Arc<[Resource]>) {
        self.lock().insert(category.to_string(), resources);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<[Resource]>>> {
        // entries are only ever replaced whole, so a poisoned map is still consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fetches and parses category documents from a [`Source`].
pub struct CategoryLoader<S> {
    source: S,
    cache: Option<CategoryCache>,
}

impl<S: Source> CategoryLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    /// Memoizes each category after its first successful load.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(CategoryCache::default());
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> Option<&CategoryCache> {
        self.cache.as_ref()
    }

    pub fn load_category(&self, category: &str) -> Result<Arc<[Resource]>, FetchError> {
        if let Some(resources) = self.cache.as_ref().and_then(|c| c.get(category)) {
            tracing::debug!(category, "using cached resources");
            return Ok(resources);
        }

        tracing::debug!(category, location = %self.source.location(category), "fetching");
        let markdown = self.source.fetch(category)?;
        let resources: Arc<[Resource]> = parse_resources(&markdown, category).into();
        tracing::info!(category, count = resources.len(), "loaded resources");

        if let Some(cache) = &self.cache {
            cache.insert(category, Arc::clone(&resources));
        }
        Ok(resources)
    }

    /// Loads every category and concatenates them in the order given.
    ///
    /// Categories are fetched in parallel. A category that fails to load is
    /// logged and contributes nothing.
    pub fn load_all<C: AsRef<str> + Sync>(&self, categories: &[C]) -> Vec<Resource> {
        categories
            .par_iter()
            .map(|category| {
                let category = category.as_ref();
                self.load_category(category).unwrap_or_else(|e| {
                    tracing::warn!(category, error = %e, "failed to load category");
                    Arc::from(Vec::new())
                })
            })
            .collect::<Vec<_>>()
            .iter()
            .flat_map(|resources| resources.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    /// An in-memory source that counts fetches and fails for unknown
    /// categories.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        documents: HashMap<String, String>,
        pub fetches: AtomicUsize,
    }

    impl FakeSource {
        pub fn with(mut self, category: &str, markdown: &str) -> Self {
            self.documents
                .insert(category.to_string(), markdown.to_string());
            self
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl Source for FakeSource {
        fn fetch(&self, category: &str) -> Result<String, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.documents
                .get(category)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: self.location(category),
                    status: 404,
                })
        }

        fn location(&self, category: &str) -> String {
            format!("memory://{category}.md")
        }
    }

    pub(crate) fn sample_source() -> FakeSource {
        FakeSource::default()
            .with(
                "fundamentals",
                indoc! {"
                    # Fundamentals
                    ## Beginner
                    - [Elements of AI](https://www.elementsofai.com/) - Concepts without code
                    ## Advanced
                    - [AIMA](https://aima.cs.berkeley.edu/) - The textbook
                "},
            )
            .with(
                "machine-learning",
                indoc! {"
                    # Machine Learning
                    ## Beginner
                    - [ML Crash Course](https://developers.google.com/machine-learning/crash-course)
                    ## Intermediate
                    ### Practice
                    - [Kaggle Learn](https://www.kaggle.com/learn) - Micro courses
                "},
            )
    }

    #[test]
    fn load_all_keeps_declared_order() {
        let loader = CategoryLoader::new(sample_source());

        let titles: Vec<String> = loader
            .load_all(&["machine-learning", "fundamentals"])
            .into_iter()
            .map(|r| r.title)
            .collect();

        assert_eq!(
            vec!["ML Crash Course", "Kaggle Learn", "Elements of AI", "AIMA"],
            titles
        );
    }

    #[test]
    fn failed_category_contributes_nothing() {
        let loader = CategoryLoader::new(FakeSource::default().with("b", "- [B](http://b) - ok"));

        let resources = loader.load_all(&["a", "b"]);

        assert_eq!(1, resources.len());
        assert_eq!("B", resources[0].title);
        assert_eq!("b", resources[0].category);
    }

    #[test]
    fn cached_category_is_fetched_once() {
        let loader = CategoryLoader::new(sample_source()).with_cache();

        let first = loader.load_category("fundamentals").unwrap();
        let second = loader.load_category("fundamentals").unwrap();

        assert_eq!(1, loader.source().fetch_count());
        assert_eq!(first, second);
    }

    #[test]
    fn failures_are_not_cached() {
        let loader = CategoryLoader::new(FakeSource::default()).with_cache();

        assert!(loader.load_category("missing").is_err());
        assert!(loader.load_category("missing").is_err());

        assert_eq!(2, loader.source().fetch_count());
        assert!(loader.cache().unwrap().is_empty());
    }

    #[test]
    fn uncached_loader_fetches_every_time() {
        let loader = CategoryLoader::new(sample_source());

        loader.load_category("fundamentals").unwrap();
        loader.load_category("fundamentals").unwrap();

        assert_eq!(2, loader.source().fetch_count());
    }
}
