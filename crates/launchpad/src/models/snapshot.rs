//! Snapshot document for settings export and import

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Preferences, Shortcut};

/// Suggested filename when offering an export for download
pub const EXPORT_FILENAME: &str = "launchpad-settings.json";

/// A point-in-time copy of all user data, suitable for file export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub shortcuts: Vec<Shortcut>,
    pub preferences: Preferences,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    /// Serialize as pretty-printed UTF-8 JSON for a human-readable download
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
