//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::FolderId;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Course to watch
    pub canvas: CanvasConfig,

    /// Folders to report on
    pub folders: FoldersConfig,

    /// Channel to announce in
    pub discord: DiscordConfig,

    /// Polling cadence
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Persisted state locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.canvas.base_url)?;
        Url::parse(&self.discord.api_base)?;
        if self.canvas.course_id == 0 {
            return Err(AppError::validation("canvas.course_id must be set"));
        }
        if self.folders.tracked.is_empty() {
            return Err(AppError::validation("folders.tracked is empty"));
        }
        if self.folders.homework_index >= self.folders.tracked.len() {
            return Err(AppError::validation(format!(
                "folders.homework_index {} is out of range for {} tracked folders",
                self.folders.homework_index,
                self.folders.tracked.len()
            )));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.folders.tracked.iter().find(|id| !seen.insert(**id)) {
            return Err(AppError::validation(format!(
                "folders.tracked lists folder {dup} twice"
            )));
        }
        if self.discord.channel_id == 0 {
            return Err(AppError::validation("discord.channel_id must be set"));
        }
        if self.schedule.interval_secs == 0 {
            return Err(AppError::validation("schedule.interval_secs must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Canvas course settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas instance root, e.g. `https://csus.instructure.com`
    pub base_url: String,

    /// Numeric course id
    pub course_id: u64,
}

/// Tracked folder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldersConfig {
    /// Folder ids to report on, in announcement order
    pub tracked: Vec<FolderId>,

    /// Position of the homework folder within `tracked`
    #[serde(default = "defaults::homework_index")]
    pub homework_index: usize,
}

impl FoldersConfig {
    /// Id of the homework folder, if the index is in range.
    pub fn homework_folder(&self) -> Option<FolderId> {
        self.tracked.get(self.homework_index).copied()
    }
}

/// Discord channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Channel snowflake
    pub channel_id: u64,

    /// REST API root
    #[serde(default = "defaults::discord_api_base")]
    pub api_base: String,
}

/// Polling cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between check cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// File holding the last-checked instant
    #[serde(default = "defaults::last_check_file")]
    pub last_check_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            last_check_file: defaults::last_check_file(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn homework_index() -> usize {
        2
    }
    pub fn discord_api_base() -> String {
        "https://discord.com/api/v10".into()
    }
    pub fn interval() -> u64 {
        30
    }
    pub fn last_check_file() -> PathBuf {
        PathBuf::from("storage/last_check.log")
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; coursewatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
}
