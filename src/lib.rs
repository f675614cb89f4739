pub mod config;
pub mod diff;
pub mod loader;
pub mod logging;
pub mod page;
pub mod parser;
pub mod render;
pub mod resource;
pub mod source;
pub mod store;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use loader::{CategoryCache, CategoryLoader};
pub use parser::parse_resources;
pub use render::{render_cards, Container};
pub use resource::{Level, Resource};
pub use source::{DirSource, FetchError, Source};
pub use store::{LevelFilter, ResourceStore};
