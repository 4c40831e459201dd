//! Config directory plumbing for Launchpad
//!
//! The file-backed storage tiers live in the shared Launchpad config
//! directory (~/.config/launchpad/). This crate resolves that directory
//! and provides the JSON file helpers the tiers are built on.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Get the Launchpad config directory (~/.config/launchpad/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("launchpad"))
}

/// Ensure the Launchpad config directory exists, creating it if needed
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().context("Could not determine config directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

/// Load and parse a JSON file
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Save a value as pretty-printed JSON.
///
/// Writes to a sibling temp file and renames it into place, so a crash
/// mid-write leaves the previous file intact rather than a truncated one.
pub fn save_json_file<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    std::fs::write(&tmp, content)
        .with_context(|| format!("Failed to write config file: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace config file: {}", path.display()))?;
    Ok(())
}
