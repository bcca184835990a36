use crate::config::types::{ConfigFile, LoggingConfig, ResolvedConfig};
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `config_path`, or the default location when `None`.
    ///
    /// A missing file at the default location yields the built-in defaults;
    /// a missing explicit path is an error.
    pub fn load(config_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            if config_path.is_none() {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(ResolvedConfig::default());
            }
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let mut resolved = Self::from_toml(&s, &path.display().to_string())?;
        resolved.source = Some(path);
        Ok(resolved)
    }

    /// Parses and resolves configuration text. `origin` names it in errors.
    pub fn from_toml(s: &str, origin: &str) -> Result<ResolvedConfig, ConfigError> {
        let cf: ConfigFile =
            toml::from_str(s).map_err(|e| ConfigError::ParseError(origin.to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }

        let logging = Self::resolve_logging(&cf.logging)?;
        Ok(ResolvedConfig {
            source: None,
            placeholder: cf.placeholder.filter(|text| !text.is_empty()),
            frontmatter: cf.frontmatter,
            logging,
        })
    }

    fn resolve_logging(log_cfg: &LoggingConfig) -> Result<LoggingConfig, ConfigError> {
        // Resolve log file path if present
        let Some(ref file) = log_cfg.file else {
            return Ok(log_cfg.clone());
        };
        Ok(LoggingConfig {
            level: log_cfg.level.clone(),
            file_level: log_cfg.file_level.clone(),
            file: Some(expand_path(&file.to_string_lossy())?),
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("mdfront").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("mdfront").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_placeholder_is_dropped() {
        let resolved = ConfigLoader::from_toml("version = 1\nplaceholder = \"\"", "inline").unwrap();
        assert_eq!(resolved.placeholder, None);
    }

    #[test]
    fn absolute_log_file_is_kept() {
        let toml = "version = 1\n[logging]\nfile = \"/var/log/mdfront.log\"";
        let resolved = ConfigLoader::from_toml(toml, "inline").unwrap();
        assert_eq!(resolved.logging.file, Some(PathBuf::from("/var/log/mdfront.log")));
        assert_eq!(resolved.logging.level, "info");
    }
}
