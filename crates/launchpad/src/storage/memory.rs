//! In-memory storage tier
//!
//! Used for tests and as the degradation target when no backing store
//! exists on the host.

use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

use super::StorageTier;

/// In-memory implementation of [`StorageTier`]
///
/// A HashMap behind an RwLock. Can be constructed as "unavailable" to
/// exercise the no-backing-store degradation path.
pub struct MemoryTier {
    records: RwLock<HashMap<String, Value>>,
    available: bool,
}

impl MemoryTier {
    /// Create an empty, available in-memory tier
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            available: true,
        }
    }

    /// Create a tier that reports no backing store.
    ///
    /// Reads return nothing and writes are silently dropped, matching the
    /// behavior of a host without storage support.
    pub fn unavailable() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            available: false,
        }
    }

    /// Number of records currently stored (for tests)
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Whether the tier holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageTier for MemoryTier {
    fn is_available(&self) -> bool {
        self.available
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        if !self.available {
            return Ok(None);
        }
        Ok(self.records.read().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        if !self.available {
            return Ok(());
        }
        self.records
            .write()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.available {
            return Ok(());
        }
        self.records.write().unwrap().remove(key);
        Ok(())
    }
}
