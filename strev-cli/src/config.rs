use crate::error::{CliError, Result};
use platforms_parser::extractor::platform_configs::PlatformConfigs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "anistrev";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Request timeout in seconds
    pub timeout: u64,
    /// Overrides the built-in browser user agent
    pub user_agent: Option<String>,
    pub platforms: PlatformConfigs,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: None,
            platforms: PlatformConfigs::default(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| CliError::Config("no configuration directory on this system".into()))
    }

    fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Loads the configuration, falling back to defaults when the file does
    /// not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn show(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the defaults to `path`, creating parent directories.
    pub fn reset(path: Option<&Path>) -> Result<()> {
        let path = Self::resolve_path(path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Self::default().show()?)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            return Err(CliError::Config("timeout must be at least 1 second".into()));
        }
        let gogocdn = &self.platforms.gogocdn;
        for (name, key) in [("page_key", &gogocdn.page_key), ("response_key", &gogocdn.response_key)] {
            if ![16, 24, 32].contains(&key.len()) {
                return Err(CliError::Config(format!(
                    "gogocdn.{name} must be 16, 24 or 32 bytes, got {}",
                    key.len()
                )));
            }
        }
        if gogocdn.iv.len() != 16 {
            return Err(CliError::Config(format!(
                "gogocdn.iv must be 16 bytes, got {}",
                gogocdn.iv.len()
            )));
        }
        Ok(())
    }
}
