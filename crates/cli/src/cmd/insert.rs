use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use mdfront_core::config::types::ResolvedConfig;
use mdfront_core::{FrontmatterDataApi, INSERT_FRONTMATTER};
use tracing::{info, warn};

use super::load_file;

pub fn run(cfg: &ResolvedConfig, path: &Path, write: bool) -> Result<()> {
    let (mut editor, frontmatter) = load_file(cfg, path)?;

    if editor.is_enabled(INSERT_FRONTMATTER) {
        editor.execute(INSERT_FRONTMATTER)?;
    } else if frontmatter.is_loaded() {
        warn!(path = %path.display(), "document already has frontmatter, left unchanged");
    } else {
        warn!(path = %path.display(), "frontmatter cannot be inserted here");
    }

    let out = editor.get_data_with_frontmatter();
    if write {
        fs::write(path, &out).wrap_err_with(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "written");
        println!("OK   {}", path.display());
    } else {
        println!("{out}");
    }
    Ok(())
}
