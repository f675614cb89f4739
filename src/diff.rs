//! Card-level comparison of a rendered page against the one on disk, used by
//! `render --check`.

use console::Style;
use lazy_static::lazy_static;
use regex::Regex;
use similar::{capture_diff_slices, Algorithm, DiffTag};

lazy_static! {
    static ref CARD_BLOCK: Regex =
        Regex::new(r#"(?s)<div class="resource-card [^"]*">.*?</a>\s*</div>\s*</div>"#).unwrap();
    static ref CARD_TITLE: Regex = Regex::new(r#"<h3 class="resource-title">(.*?)</h3>"#).unwrap();
    static ref CARD_LINK: Regex = Regex::new(r#"<a href="([^"]*)" class="resource-link""#).unwrap();
}

/// One card as found in page HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCard<'a> {
    pub title: &'a str,
    pub href: &'a str,
    pub block: &'a str,
}

/// Cards of a page in document order.
pub fn page_cards(html: &str) -> Vec<PageCard<'_>> {
    CARD_BLOCK
        .find_iter(html)
        .map(|m| {
            let block = m.as_str();
            let capture = |re: &Regex| {
                re.captures(block)
                    .and_then(|c| c.get(1))
                    .map_or("", |g| g.as_str())
            };
            PageCard {
                title: capture(&*CARD_TITLE),
                href: capture(&*CARD_LINK),
                block,
            }
        })
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageCheck {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Same link in the same place, different card content.
    pub changed: Vec<String>,
    /// Anything at all differs, including the heading or page chrome.
    pub outdated: bool,
}

impl PageCheck {
    pub fn is_up_to_date(&self) -> bool {
        !self.outdated
    }

    pub fn summary(&self) -> String {
        if !self.outdated {
            return "up to date".to_string();
        }
        let mut summary = format!(
            "{} added, {} removed, {} changed",
            self.added.len(),
            self.removed.len(),
            self.changed.len()
        );
        if self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty() {
            summary.push_str(" (page outside the cards differs)");
        }
        summary
    }

    /// One styled line per card change followed by the summary.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let lines = [
            ("+", Style::new().green(), &self.added),
            ("-", Style::new().red(), &self.removed),
            ("~", Style::new().yellow(), &self.changed),
        ];
        for (sign, style, titles) in lines {
            for title in titles {
                out.push_str(&format!("{} {}\n", style.apply_to(sign).bold(), title));
            }
        }
        out.push_str(&self.summary());
        out.push('\n');
        out
    }
}

/// Compares the cards of `current` with those of `rendered`, matching cards
/// by their link.
pub fn check_page(current: &str, rendered: &str) -> PageCheck {
    let old = page_cards(current);
    let new = page_cards(rendered);
    let old_links: Vec<&str> = old.iter().map(|c| c.href).collect();
    let new_links: Vec<&str> = new.iter().map(|c| c.href).collect();

    let mut check = PageCheck {
        outdated: current != rendered,
        ..PageCheck::default()
    };
    for op in capture_diff_slices(Algorithm::Myers, &old_links, &new_links) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                for (old_card, new_card) in old[old_range].iter().zip(&new[new_range]) {
                    if old_card.block != new_card.block {
                        check.changed.push(new_card.title.to_string());
                    }
                }
            }
            DiffTag::Delete | DiffTag::Insert | DiffTag::Replace => {
                check
                    .removed
                    .extend(old[old_range].iter().map(|c| c.title.to_string()));
                check
                    .added
                    .extend(new[new_range].iter().map(|c| c.title.to_string()));
            }
        }
    }
    check
}
