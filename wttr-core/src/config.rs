use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::ImageBackend;

pub const DEFAULT_BASE_URL: &str = "https://wttr.in/";
pub const DEFAULT_BASE_URL_V2: &str = "https://v2.wttr.in/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// wttr.in serves plain output to curl-like agents.
pub const DEFAULT_USER_AGENT: &str = "curl/7.54.0";
pub const DEFAULT_BOT_USERNAME: &str = "wttr";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// bot_username = "wttr"
/// timeout_secs = 30
/// output_dir = "/tmp/wttr"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for JSON, one-line and classic image requests.
    pub base_url: String,
    /// Base URL for the v2 image backend.
    pub base_url_v2: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// The bot's own name, replaced with a placeholder before parsing commands.
    pub bot_username: String,
    /// Where the console host writes image replies; current dir when unset.
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            base_url_v2: DEFAULT_BASE_URL_V2.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            bot_username: DEFAULT_BOT_USERNAME.to_string(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if cfg.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wttr", "wttr-bot")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL serving the given image backend.
    pub fn base_for(&self, backend: ImageBackend) -> &str {
        match backend {
            ImageBackend::V1 => &self.base_url,
            ImageBackend::V2 => &self.base_url_v2,
        }
    }
}
