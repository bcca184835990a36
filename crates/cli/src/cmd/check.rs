//! Load/save stability check over a directory of markdown files.

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use mdfront_core::FrontmatterDataApi;
use mdfront_core::config::types::ResolvedConfig;
use tabled::{Table, Tabled, settings::Style};
use walkdir::WalkDir;

use super::{load_text, read};

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Frontmatter")]
    frontmatter: &'static str,
    #[tabled(rename = "Changed")]
    changed: &'static str,
    #[tabled(rename = "Stable")]
    stable: &'static str,
}

/// Outcome of saving a document twice.
struct RoundTrip {
    frontmatter: bool,
    /// First save differs from the input.
    changed: bool,
    /// Second save equals the first.
    stable: bool,
}

fn round_trip(cfg: &ResolvedConfig, raw: &str) -> Result<RoundTrip> {
    let (editor, frontmatter) = load_text(cfg, raw)?;
    let once = editor.get_data_with_frontmatter();
    let (editor, _) = load_text(cfg, &once)?;
    let twice = editor.get_data_with_frontmatter();
    Ok(RoundTrip {
        frontmatter: frontmatter.is_loaded(),
        changed: once != raw,
        stable: once == twice,
    })
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

pub fn run(cfg: &ResolvedConfig, dir: &Path, all: bool) -> Result<()> {
    let mut rows = Vec::new();
    let mut total = 0;
    let mut unstable = 0;

    let entries = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"));
    for entry in entries {
        total += 1;
        let raw = read(entry.path())?;
        let result = round_trip(cfg, &raw)
            .wrap_err_with(|| format!("failed to check {}", entry.path().display()))?;
        if !result.stable {
            unstable += 1;
        }
        if all || !result.stable {
            let file = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            rows.push(CheckRow {
                file: file.display().to_string(),
                frontmatter: yes_no(result.frontmatter),
                changed: yes_no(result.changed),
                stable: yes_no(result.stable),
            });
        }
    }

    if !rows.is_empty() {
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }
    println!("{unstable} of {total} files unstable");

    if unstable > 0 {
        std::process::exit(1);
    }
    Ok(())
}
