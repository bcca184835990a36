use std::path::Path;

use color_eyre::eyre::Result;
use mdfront_core::config::types::ResolvedConfig;
use mdfront_core::model::ElementKind;
use mdfront_core::{Editor, INSERT_FRONTMATTER};
use serde::Serialize;

use super::load_file;

/// Status report for JSON output.
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub path: String,
    pub frontmatter: bool,
    pub insert_enabled: bool,
    /// Top-level block kinds in document order.
    pub blocks: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl StatusOutput {
    fn collect(path: &Path, editor: &Editor, present: bool) -> Self {
        let document = editor.model().document();
        let blocks = document
            .root()
            .map(|root| root.children().iter().map(|element| element.kind().name()).collect())
            .unwrap_or_default();
        let body = document
            .element(&[0, 0])
            .filter(|element| element.is(&ElementKind::Frontmatter))
            .map(|element| element.text());

        Self {
            path: path.display().to_string(),
            frontmatter: present,
            insert_enabled: editor.is_enabled(INSERT_FRONTMATTER),
            blocks,
            body,
        }
    }
}

pub fn run(cfg: &ResolvedConfig, path: &Path, json: bool) -> Result<()> {
    let (editor, frontmatter) = load_file(cfg, path)?;
    let status = StatusOutput::collect(path, &editor, frontmatter.is_loaded());

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("path: {}", status.path);
    println!("frontmatter: {}", if status.frontmatter { "yes" } else { "no" });
    println!("insert: {}", if status.insert_enabled { "enabled" } else { "disabled" });
    println!("blocks: {}", status.blocks.join(", "));
    if let Some(body) = &status.body {
        println!("body:");
        for line in body.lines() {
            println!("  {line}");
        }
    }
    Ok(())
}
