use lazy_static::lazy_static;
use regex::Regex;

use crate::resource::{Level, Resource};

lazy_static! {
    // each field is found on its own, so a title may itself contain brackets
    static ref ITEM_TITLE: Regex = Regex::new(r"^-\x20\[(.+?)\]").unwrap();
    static ref ITEM_URL: Regex = Regex::new(r"\]\((.+?)\)").unwrap();
    static ref ITEM_DESCRIPTION: Regex = Regex::new(r"^\)\s*-\s*(.*)$").unwrap();
}

/// A `- [Title](URL) - Description` list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub description: &'a str,
}

/// One classified line of a category document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    DocumentTitle(&'a str),
    LevelHeading(&'a str),
    Subsection(&'a str),
    Item(Item<'a>),
    Other,
}

impl<'a> Token<'a> {
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim_end();

        if let Some(text) = line.strip_prefix("### ") {
            Token::Subsection(text.trim())
        } else if let Some(text) = line.strip_prefix("## ") {
            Token::LevelHeading(text.trim())
        } else if let Some(text) = line.strip_prefix("# ") {
            Token::DocumentTitle(text.trim())
        } else if let Some(item) = Item::extract(line) {
            Token::Item(item)
        } else {
            Token::Other
        }
    }
}

impl<'a> Item<'a> {
    fn extract(line: &'a str) -> Option<Self> {
        let title = ITEM_TITLE.captures(line)?.get(1)?.as_str();
        let url = ITEM_URL.captures(line)?;
        let description = ITEM_DESCRIPTION
            .captures(&line[url.get(0)?.end() - 1..])
            .and_then(|c| c.get(1))
            .map_or("", |m| m.as_str());

        Some(Self {
            title: title.trim(),
            url: url.get(1)?.as_str().trim(),
            description: description.trim(),
        })
    }
}

/// Splits a document into classified lines.
pub fn tokenize(markdown: &str) -> impl Iterator<Item = Token<'_>> {
    markdown.lines().map(Token::classify)
}

struct ParseState {
    category: String,
    level: Level,
    subsection: String,
    /// Only a `# ` line ahead of everything else names the document.
    expect_title: bool,
}

impl ParseState {
    fn advance(&mut self, token: Token) -> Option<Resource> {
        let expect_title = std::mem::replace(&mut self.expect_title, false);
        match token {
            Token::DocumentTitle(title) => {
                if expect_title {
                    self.category = title.to_string();
                }
                None
            }
            Token::Other => {
                self.expect_title = expect_title;
                None
            }
            Token::LevelHeading(heading) => {
                self.level = Level::from_heading(heading);
                None
            }
            Token::Subsection(subsection) => {
                self.subsection = subsection.to_string();
                None
            }
            Token::Item(item) if !item.title.is_empty() && !item.url.is_empty() => {
                Some(Resource::new(
                    item.title,
                    item.url,
                    item.description,
                    self.category.as_str(),
                    self.subsection.as_str(),
                    self.level,
                ))
            }
            Token::Item(_) => None,
        }
    }
}

/// Parses a category document into its resources, in document order.
///
/// `category` names the document unless it opens with a `# Title` line;
/// later top-level headings do not move resources to another category.
/// Lines that are neither headings nor well formed resource entries are
/// skipped.
pub fn parse_resources(markdown: &str, category: &str) -> Vec<Resource> {
    let mut state = ParseState {
        category: category.to_string(),
        level: Level::default(),
        subsection: String::new(),
        expect_title: true,
    };

    tokenize(markdown)
        .filter_map(|token| state.advance(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    macro_rules! classify_tests {
        ($($name:ident $line:expr => $token:expr)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!($token, Token::classify($line));
                }
            )*
        }
    }

    classify_tests! {
        document_title "# Machine Learning" => Token::DocumentTitle("Machine Learning")
        level_heading "## Beginner Resources  " => Token::LevelHeading("Beginner Resources")
        subsection "### Online Courses\r" => Token::Subsection("Online Courses")
        four_hashes_is_other "#### Deep" => Token::Other
        hash_without_space "#hashtag" => Token::Other
        item_with_description "- [A](http://x) - d1" => Token::Item(Item { title: "A", url: "http://x", description: "d1" })
        item_without_description "- [C](http://z)" => Token::Item(Item { title: "C", url: "http://z", description: "" })
        item_description_with_dashes "- [D](http://d) - learn - practice" => Token::Item(Item { title: "D", url: "http://d", description: "learn - practice" })
        item_missing_url "- [A] http://x" => Token::Other
        item_empty_title "- [](http://x)" => Token::Other
        item_space_before_url "- [A] (http://x)" => Token::Other
        item_bracketed_title "- [C++ [book]](http://x) - d" => Token::Item(Item { title: "C++ [book", url: "http://x", description: "d" })
        plain_bullet "- just text" => Token::Other
        indented_item "  - [A](http://x)" => Token::Other
        prose "Some intro paragraph." => Token::Other
    }

    #[test]
    fn levels_follow_headings_in_order() {
        let document = indoc! {"
            ## Beginner
            - [A](http://x) - d1
            ## Advanced Topics
            - [B](http://y) - d2
        "};

        let resources = parse_resources(document, "fundamentals");

        assert_eq!(2, resources.len());
        assert_eq!(("A", Level::Beginner), (resources[0].title.as_str(), resources[0].level));
        assert_eq!(("B", Level::Advanced), (resources[1].title.as_str(), resources[1].level));
    }

    #[test]
    fn full_document() {
        let document = indoc! {"
            # Machine Learning

            Intro text that is not a resource.

            ## Beginner Resources

            ### Courses
            - [ML Crash Course](https://developers.google.com/machine-learning/crash-course) - Google's intro
            - [No Description](https://example.com/a)

            ### Books
            - [Hands-On ML](https://example.com/b) - Practical book

            ## Intermediate Resources
            - [Kaggle Learn](https://www.kaggle.com/learn) - Micro courses
        "};

        let resources = parse_resources(document, "machine-learning");

        assert_eq!(
            vec![
                Resource::new(
                    "ML Crash Course",
                    "https://developers.google.com/machine-learning/crash-course",
                    "Google's intro",
                    "Machine Learning",
                    "Courses",
                    Level::Beginner,
                ),
                Resource::new(
                    "No Description",
                    "https://example.com/a",
                    "",
                    "Machine Learning",
                    "Courses",
                    Level::Beginner,
                ),
                Resource::new(
                    "Hands-On ML",
                    "https://example.com/b",
                    "Practical book",
                    "Machine Learning",
                    "Books",
                    Level::Beginner,
                ),
                Resource::new(
                    "Kaggle Learn",
                    "https://www.kaggle.com/learn",
                    "Micro courses",
                    "Machine Learning",
                    "Books",
                    Level::Intermediate,
                ),
            ],
            resources
        );
        assert_eq!(vec!["beginner", "machine-learning"], resources[0].tags);
    }

    #[test]
    fn later_top_level_heading_keeps_category() {
        let document = indoc! {"
            # Fundamentals
            ## Beginner
            - [A](http://a) - x
            # Further Reading
            - [B](http://b) - y
        "};

        let resources = parse_resources(document, "fundamentals");

        assert_eq!(
            vec!["Fundamentals", "Fundamentals"],
            resources.iter().map(|r| r.category.as_str()).collect::<Vec<_>>()
        );
        let store = crate::ResourceStore::from_resources(resources);
        assert_eq!(
            vec!["A", "B"],
            store
                .filter_by_tag("fundamentals")
                .iter()
                .map(|r| r.title.as_str())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn only_leading_title_names_document() {
        let document = indoc! {"
            Some intro.
            # Intro Title
            - [A](http://a)
        "};
        assert_eq!("Intro Title", parse_resources(document, "nlp")[0].category);

        let document = indoc! {"
            ## Beginner
            # Late Title
            - [A](http://a)
        "};
        assert_eq!("nlp", parse_resources(document, "nlp")[0].category);
    }

    #[test]
    fn entry_before_any_heading_is_intermediate_without_subsection() {
        let resources = parse_resources("- [Early](http://e) - first", "nlp");

        assert_eq!(1, resources.len());
        assert_eq!(Level::Intermediate, resources[0].level);
        assert_eq!("", resources[0].subcategory);
        assert_eq!("nlp", resources[0].category);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let document = indoc! {"
            ## Beginner
            - [Broken(http://x)
            - Missing link
            [Not a list](http://y)
            - [Good](http://z)
        "};

        let resources = parse_resources(document, "nlp");

        assert_eq!(1, resources.len());
        assert_eq!("Good", resources[0].title);
        assert_eq!("", resources[0].description);
    }

    #[test]
    fn duplicates_are_kept() {
        let document = "- [A](http://x)\n- [A](http://x)\n";
        assert_eq!(2, parse_resources(document, "nlp").len());
    }

    #[test]
    fn empty_document() {
        assert!(parse_resources("", "nlp").is_empty());
    }

    proptest! {
        #[test]
        fn parse_never_panics_and_always_tags(document in "(#{0,4} ?|- \\[|\\]\\(|\\) - |[a-zA-Z :/.]|\n){0,200}") {
            for resource in parse_resources(&document, "Fuzz Category") {
                prop_assert!(!resource.title.is_empty());
                prop_assert!(!resource.url.is_empty());
                prop_assert_eq!(2, resource.tags.len());
                prop_assert_eq!(resource.level.as_str(), resource.tags[0].as_str());
            }
        }
    }
}
