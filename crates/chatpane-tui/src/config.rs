use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::anchor::ScrollBehavior;
use crate::transcript::DEFAULT_BUBBLE_WIDTH_PERCENT;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Widest a bubble may get, as a percentage of the pane
    pub bubble_width_percent: u16,
    pub smooth_scroll: bool,
    /// Animation tick interval in milliseconds
    pub tick_ms: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            bubble_width_percent: DEFAULT_BUBBLE_WIDTH_PERCENT,
            smooth_scroll: true,
            tick_ms: 150,
            log_file: None,
        }
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn scroll_behavior(&self) -> ScrollBehavior {
        if self.smooth_scroll {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        }
    }

    /// Log file from config, else `<cache dir>/chatpane/chatpane.log`
    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow!("Could not determine cache directory"))?;
        Ok(cache_dir.join("chatpane").join("chatpane.log"))
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("chatpane").join("config.json"))
    }
}
