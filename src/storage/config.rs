//! Config File Storage
//!
//! Persists `BridgeConfig` as pretty-printed JSON. Every write is validated first.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{BridgeConfig, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_dir};

/// Owns the on-disk bridge configuration
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: BridgeConfig,
}

impl ConfigService {
    /// Open the default config file (~/.memory-bridge/config.json), creating defaults if missing
    pub fn new() -> AppResult<Self> {
        Self::open_at(config_path()?)
    }

    /// Open a config file at an explicit path, creating defaults if missing
    pub fn open_at(path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = path.into();
        if let Some(parent) = config_path.parent() {
            ensure_dir(parent)?;
        }

        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = BridgeConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            tracing::info!(path = %config_path.display(), "Created default configuration");
            default_config
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    fn load_from_file(path: &Path) -> AppResult<BridgeConfig> {
        let content = fs::read_to_string(path)?;
        let config: BridgeConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    fn save_to_file(path: &Path, config: &BridgeConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Borrow the active configuration
    pub fn get_config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Owned copy of the active configuration
    pub fn get_config_clone(&self) -> BridgeConfig {
        self.config.clone()
    }

    /// Update the configuration with a partial update.
    ///
    /// The in-memory config is left untouched if the result fails validation.
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<BridgeConfig> {
        let mut next = self.config.clone();
        next.apply_update(update);
        Self::save_to_file(&self.config_path, &next)?;
        self.config = next;
        Ok(self.config.clone())
    }

    /// Write the active configuration back to its file
    pub fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    /// Re-read the file, discarding in-memory state
    pub fn reload(&mut self) -> AppResult<()> {
        self.config = Self::load_from_file(&self.config_path)?;
        Ok(())
    }

    /// Replace the configuration with defaults and persist them
    pub fn reset(&mut self) -> AppResult<()> {
        self.config = BridgeConfig::default();
        self.save()?;
        Ok(())
    }

    /// File present and configuration valid
    pub fn is_healthy(&self) -> bool {
        self.config_path.exists() && self.config.validate().is_ok()
    }
}
