#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

//! Frontmatter editing on a structured markdown document model.

pub mod config;
pub mod data;
pub mod editor;
pub mod frontmatter;
pub mod model;

pub use editor::{Editor, EditorError};
pub use frontmatter::{Frontmatter, FrontmatterConfig, FrontmatterDataApi, INSERT_FRONTMATTER};
pub use model::ModelError;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Editor with frontmatter support configured from `config`.
pub fn editor_from_config(config: &config::ResolvedConfig) -> (Editor, Frontmatter) {
    let mut editor = Editor::new();
    editor.set_placeholder(config.placeholder.clone());
    let frontmatter = Frontmatter::register(&mut editor, config.frontmatter.clone());
    (editor, frontmatter)
}
