use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricSyncConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How often the position is sampled and fed to the session
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// How long playback continues after the last line starts
    #[serde(default = "default_tail")]
    pub tail_ms: u64,
}

const fn default_tick_interval() -> u64 {
    100
}

const fn default_tail() -> u64 {
    5000
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            tail_ms: default_tail(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Lines shown before the active line
    #[serde(default = "default_context")]
    pub context_before: usize,
    /// Lines shown after the active line
    #[serde(default = "default_context")]
    pub context_after: usize,
    #[serde(default)]
    pub output: OutputFormat,
}

const fn default_context() -> usize {
    1
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            context_before: default_context(),
            context_after: default_context(),
            output: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to a file
    #[serde(default)]
    pub enabled: bool,
}

impl LyricSyncConfig {
    /// Get the config file path (~/.config/lyricsync/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from the default path or create a template on first run.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing the template, or an
    /// error if the file cannot be read, parsed or validated.
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::write(&config_path, CONFIG_TEMPLATE)?;
            info!("Wrote config template to {}", config_path.display());

            return Err(CoreError::ConfigNotFound { path: config_path });
        }

        Self::load(&config_path)
    }

    /// Load and validate config from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is invalid.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigInvalid`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.playback.tick_interval_ms == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "playback.tick_interval_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r##"# lyricsync configuration
# ~/.config/lyricsync/config.toml

[playback]
# How often the playback position is sampled (milliseconds, > 0)
tick_interval_ms = 100
# How long playback keeps running after the last lyric line starts
tail_ms = 5000

[display]
# Lines shown around the active line
context_before = 1
context_after = 1
# "text" or "json" (one event per line)
output = "text"

[logging]
# Also write logs to ~/.cache/lyricsync/lyricsync.log
enabled = false
"##;
