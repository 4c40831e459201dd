//! Storage tier trait definition

use anyhow::Result;
use serde_json::Value;

/// Record key for the shortcut list
pub const KEY_SHORTCUTS: &str = "shortcuts";
/// Record key for the preferences object
pub const KEY_PREFERENCES: &str = "preferences";
/// Record key for the background image blob (local tier only)
pub const KEY_BG_IMAGE: &str = "bgImage";

/// A single key-value storage tier.
///
/// Two tiers exist at runtime: a small-quota "synced" tier whose contents
/// replicate across a user's devices, and a larger "local" tier bound to
/// one device. The trait abstracts over file-backed and in-memory
/// implementations; which record lands in which tier is decided by the
/// merge policy in `storage::persist`, not here.
pub trait StorageTier: Send + Sync {
    /// Whether a backing store exists at all.
    ///
    /// When false, reads yield nothing and writes are dropped; callers
    /// degrade to built-in defaults.
    fn is_available(&self) -> bool;

    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Remove the value stored under `key`, if any
    fn remove(&self, key: &str) -> Result<()>;
}
