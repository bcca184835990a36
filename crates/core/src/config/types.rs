use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::frontmatter::FrontmatterConfig;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    /// Prompt shown while the document is empty.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Template for inserted frontmatter blocks.
    #[serde(default)]
    pub frontmatter: Option<FrontmatterConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// File the configuration was read from; `None` for built-in defaults.
    pub source: Option<PathBuf>,
    pub placeholder: Option<String>,
    pub frontmatter: Option<FrontmatterConfig>,
    pub logging: LoggingConfig,
}
