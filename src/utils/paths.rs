//! Cross-Platform Path Utilities
//!
//! Resolves the Memory Bridge configuration directory (~/.memory-bridge/).

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Memory Bridge directory (~/.memory-bridge/)
pub fn memory_bridge_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".memory-bridge"))
}

/// Get the config file path (~/.memory-bridge/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(memory_bridge_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
