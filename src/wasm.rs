//! Browser bindings.
//!
//! The page fetches each `resources/<category>.md` itself and hands the text
//! to a [`ResourceHub`], which keeps the store and answers page events with
//! rendered HTML.
//!
//! ```javascript,ignore
//! import init, { ResourceHub } from './reshub.js';
//!
//! await init();
//! const hub = new ResourceHub();
//! for (const category of ResourceHub.default_categories()) {
//!     const response = await fetch(`resources/${category}.md`);
//!     if (response.ok) hub.add_document(category, await response.text());
//! }
//! document.getElementById('resources-container').outerHTML = hub.initial_html();
//! ```

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::{
    config::DEFAULT_CATEGORIES,
    page::{Effect, Event, Page, PageLayout},
    parser::parse_resources,
    render::{render_cards, Container},
    resource::Resource,
    store::ResourceStore,
};

#[wasm_bindgen]
pub struct ResourceHub {
    resources: Vec<Resource>,
    page: Page,
}

#[wasm_bindgen]
impl ResourceHub {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            page: Page::new(ResourceStore::new(), PageLayout::default()),
        }
    }

    pub fn default_categories() -> Array {
        DEFAULT_CATEGORIES.iter().map(|c| JsValue::from_str(c)).collect()
    }

    /// Parses one category document and appends its resources. Returns how
    /// many were found.
    pub fn add_document(&mut self, category: &str, markdown: &str) -> usize {
        let parsed = parse_resources(markdown, category);
        let count = parsed.len();
        self.resources.extend(parsed);
        self.page
            .replace_store(ResourceStore::from_resources(self.resources.clone()));
        count
    }

    pub fn len(&self) -> usize {
        self.page.store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.page.store().is_empty()
    }

    /// All resources as JSON.
    pub fn resources_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.page.store().resources())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn initial_html(&mut self) -> String {
        self.dispatch(Event::Loaded)
    }

    pub fn category_html(&mut self, category: &str) -> String {
        self.dispatch(Event::PathCard(category.to_string()))
    }

    pub fn filter_html(&mut self, filter: &str) -> String {
        self.dispatch(Event::Filter(filter.to_string()))
    }

    pub fn active_filter(&self) -> String {
        self.page.active_filter().to_string()
    }

    /// The heading for the resources section after the last event.
    pub fn heading(&self) -> Option<String> {
        self.page
            .current_category()
            .map(crate::render::section_title)
    }
}

impl ResourceHub {
    /// Container HTML for the last render the event produced, or an empty
    /// string when the event rendered nothing.
    fn dispatch(&mut self, event: Event) -> String {
        self.page
            .handle(event)
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Render(resources) => {
                    let mut container = Container::resources();
                    render_cards(&resources, &mut container);
                    Some(container.to_html())
                }
                _ => None,
            })
            .last()
            .unwrap_or_default()
    }
}

impl Default for ResourceHub {
    fn default() -> Self {
        Self::new()
    }
}
