pub mod check;
pub mod codec;
pub mod completions;
pub mod doctor;
pub mod insert;
pub mod show;
pub mod status;

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use mdfront_core::config::types::ResolvedConfig;
use mdfront_core::{Editor, Frontmatter, FrontmatterDataApi, editor_from_config};

pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
}

/// Loads `raw` into a new editor configured from `cfg`.
pub fn load_text(cfg: &ResolvedConfig, raw: &str) -> Result<(Editor, Frontmatter)> {
    let (mut editor, frontmatter) = editor_from_config(cfg);
    editor.set_data_with_frontmatter(raw).wrap_err("failed to load document")?;
    Ok((editor, frontmatter))
}

/// Reads `path` and loads it into a new editor configured from `cfg`.
pub fn load_file(cfg: &ResolvedConfig, path: &Path) -> Result<(Editor, Frontmatter)> {
    let raw = read(path)?;
    load_text(cfg, &raw).wrap_err_with(|| format!("in {}", path.display()))
}
