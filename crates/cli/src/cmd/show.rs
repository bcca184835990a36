use std::path::Path;

use color_eyre::eyre::Result;
use mdfront_core::FrontmatterDataApi;
use mdfront_core::config::types::ResolvedConfig;

use super::load_file;

pub fn run(cfg: &ResolvedConfig, path: &Path) -> Result<()> {
    let (editor, _) = load_file(cfg, path)?;
    println!("{}", editor.get_data_with_frontmatter());
    Ok(())
}
