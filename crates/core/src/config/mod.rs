//! User configuration: the frontmatter template, the empty-document
//! placeholder and logging.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{ConfigFile, LoggingConfig, ResolvedConfig};
