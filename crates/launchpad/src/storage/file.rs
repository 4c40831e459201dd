//! File-backed storage tier
//!
//! Each tier is a single JSON object file; records are top-level keys.
//! The synced tier mirrors the quota of browser synced storage, so writes
//! that would grow the file past the quota are rejected (callers persist
//! best-effort and keep the previous record).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use super::StorageTier;

/// Quota applied to the synced tier file (matches browser synced storage)
pub const SYNCED_QUOTA_BYTES: usize = 100 * 1024;

/// Filename of the synced-tier record file
pub const SYNCED_FILENAME: &str = "synced.json";
/// Filename of the local-tier record file
pub const LOCAL_FILENAME: &str = "local.json";

/// File-backed implementation of [`StorageTier`]
pub struct FileTier {
    path: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileTier {
    /// Create a tier backed by the given file, without a quota
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::create(path, None)
    }

    /// Create a tier backed by the given file, rejecting writes that would
    /// grow the file past `quota_bytes`
    pub fn with_quota(path: impl AsRef<Path>, quota_bytes: usize) -> Result<Self> {
        Self::create(path, Some(quota_bytes))
    }

    /// The synced tier in the given directory (quota-limited)
    pub fn synced_in(dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_quota(dir.as_ref().join(SYNCED_FILENAME), SYNCED_QUOTA_BYTES)
    }

    /// The local tier in the given directory (no quota)
    pub fn local_in(dir: impl AsRef<Path>) -> Result<Self> {
        Self::new(dir.as_ref().join(LOCAL_FILENAME))
    }

    fn create(path: impl AsRef<Path>, quota_bytes: Option<usize>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create storage directory: {}", parent.display()))?;
        }
        Ok(Self { path, quota_bytes })
    }

    /// Read the whole tier file as a JSON object (empty when absent)
    fn read_records(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let value: Value = config::load_json_file(&self.path)?;
        match value {
            Value::Object(map) => Ok(map),
            other => bail!(
                "Storage file {} holds {} instead of an object",
                self.path.display(),
                json_type_name(&other)
            ),
        }
    }

    fn write_records(&self, records: &Map<String, Value>) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let size = serde_json::to_string(records)?.len();
            if size > quota {
                bail!(
                    "Write of {} bytes exceeds the {} byte quota of {}",
                    size,
                    quota,
                    self.path.display()
                );
            }
        }
        config::save_json_file(&self.path, records)
    }
}

impl StorageTier for FileTier {
    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_records()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let mut records = self.read_records()?;
        records.insert(key.to_string(), value.clone());
        self.write_records(&records)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut records = self.read_records()?;
        if records.remove(key).is_some() {
            self.write_records(&records)?;
        }
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
