use mdfront_core::config::loader::{ConfigLoader, default_config_path};
use std::path::Path;

pub fn run(config: Option<&Path>) {
    match ConfigLoader::load(config) {
        Ok(rc) => {
            println!("OK   mdfront doctor");
            match &rc.source {
                Some(path) => println!("path: {}", path.display()),
                None => println!(
                    "path: {} (not found, using defaults)",
                    default_config_path().display()
                ),
            }
            println!("placeholder: {}", rc.placeholder.as_deref().unwrap_or("(none)"));
            match &rc.frontmatter {
                Some(template) if !template.is_empty() => {
                    println!("frontmatter:");
                    for (key, value) in template.iter() {
                        println!("  {key}: {value}");
                    }
                }
                _ => println!("frontmatter: (empty block)"),
            }
            println!("logging.level: {}", rc.logging.level);
            if let Some(file) = &rc.logging.file {
                println!("logging.file: {}", file.display());
            }
        }
        Err(e) => {
            println!("FAIL mdfront doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
