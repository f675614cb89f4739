use std::fmt::Write;

use crate::resource::Resource;

pub const RESOURCES_CONTAINER_ID: &str = "resources-container";
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.svg";
pub const NO_RESOURCES_MESSAGE: &str = "No resources found matching your criteria.";

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Image shown on a card, derived from the resource's category tag.
pub fn card_image(resource: &Resource) -> String {
    format!("images/{}.jpg", resource.category_tag().unwrap_or("placeholder"))
}

/// "Machine Learning" -> "Machine Learning Resources",
/// "fundamentals" -> "Fundamentals Resources".
pub fn section_title(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{} Resources", first.to_uppercase(), chars.as_str()),
        None => "Resources".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub class: String,
    pub image: String,
    pub fallback_image: &'static str,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub href: String,
}

impl Card {
    pub fn for_resource(resource: &Resource) -> Self {
        Self {
            class: format!("resource-card {}", resource.level),
            image: card_image(resource),
            fallback_image: PLACEHOLDER_IMAGE,
            title: resource.title.clone(),
            description: resource.display_description().to_string(),
            tags: resource.tags.clone(),
            href: resource.url.clone(),
        }
    }

    fn write_html(&self, out: &mut String) {
        let title = escape_html(&self.title);
        let _ = write!(
            out,
            r#"<div class="{class}">
  <div class="resource-image">
    <img src="{image}" alt="{title}" onerror="this.onerror=null;this.src='{fallback}';">
  </div>
  <div class="resource-content">
    <div class="resource-tags">"#,
            class = escape_html(&self.class),
            image = escape_html(&self.image),
            fallback = escape_html(self.fallback_image),
        );
        for tag in &self.tags {
            let tag = escape_html(tag);
            let _ = write!(out, r#"<span class="resource-tag {tag}">{tag}</span>"#);
        }
        let _ = writeln!(
            out,
            r#"</div>
    <h3 class="resource-title">{title}</h3>
    <p class="resource-description">{description}</p>
    <a href="{href}" class="resource-link" target="_blank" rel="noopener noreferrer">Explore Resource</a>
  </div>
</div>"#,
            description = escape_html(&self.description),
            href = escape_html(&self.href),
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Card(Card),
    Placeholder(String),
}

impl Node {
    fn write_html(&self, out: &mut String) {
        match self {
            Node::Card(card) => card.write_html(out),
            Node::Placeholder(message) => {
                let _ = writeln!(out, r#"<p class="no-resources">{}</p>"#, escape_html(message));
            }
        }
    }
}

/// The element cards are rendered into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub nodes: Vec<Node>,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
        }
    }

    /// The page's `#resources-container`.
    pub fn resources() -> Self {
        Self::new(RESOURCES_CONTAINER_ID)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Card(card) => Some(card),
            Node::Placeholder(_) => None,
        })
    }

    pub fn to_html(&self) -> String {
        let mut out = format!("<div id=\"{}\">\n", escape_html(&self.id));
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out.push_str("</div>\n");
        out
    }
}

/// Replaces the container's content with one card per resource, or a single
/// placeholder when there are none.
pub fn render_cards(resources: &[Resource], container: &mut Container) {
    container.nodes = if resources.is_empty() {
        vec![Node::Placeholder(NO_RESOURCES_MESSAGE.to_string())]
    } else {
        resources
            .iter()
            .map(|resource| Node::Card(Card::for_resource(resource)))
            .collect()
    };
}

/// A standalone page holding the resources section.
pub fn render_page(heading: &str, container: &Container) -> String {
    let heading = escape_html(heading);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{heading}</title>
</head>
<body>
<section id="resources">
<h2>{heading}</h2>
{container}</section>
</body>
</html>
"#,
        container = container.to_html(),
    )
}
