//! Configuration file utilities
//!
//! Provides helper functions for locating and reading the client's
//! configuration and log directories. Config files live in the
//! platform-specific config directory under "smart-ocr-client/".

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "smart-ocr-client";

/// Get the app's config directory path.
///
/// Returns: `~/.config/smart-ocr-client` (Linux)
///          `~/Library/Application Support/smart-ocr-client` (macOS)
///          `C:\Users\<User>\AppData\Roaming\smart-ocr-client` (Windows)
pub fn get_config_dir() -> Result<PathBuf, String> {
    let config_dir = dirs::config_dir()
        .ok_or("Could not find config directory")?;
    Ok(config_dir.join(APP_DIR_NAME))
}

/// Get the directory where debug reports are written.
///
/// Returns: `~/.smart-ocr-client/logs`
pub fn get_logs_dir() -> Result<PathBuf, String> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| "Could not find home directory".to_string())?;
    Ok(home_dir.join(format!(".{}", APP_DIR_NAME)).join("logs"))
}

/// Get the full path to a config file.
pub fn config_file_path(filename: &str) -> Result<PathBuf, String> {
    Ok(get_config_dir()?.join(filename))
}

/// Load JSON data from an explicit path.
///
/// # Returns
/// * `Ok(Some(data))` if file exists and was parsed successfully
/// * `Ok(None)` if file doesn't exist
/// * `Err(...)` if file exists but couldn't be read/parsed
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, String> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    let data = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config file: {}", e))?;

    Ok(Some(data))
}
