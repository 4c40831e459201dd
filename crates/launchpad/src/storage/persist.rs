//! Dual-tier persistence: load-time migration/merge and split saves
//!
//! The synced tier is quota-limited and replicates across devices, so it
//! carries the shortcut list and the small preference fields. The large
//! background-image blob always lives in the local tier. Legacy installs
//! wrote everything to the local tier; the one-time migration path on load
//! picks that data up when the synced tier is empty.
//!
//! Saves are best-effort and independent per tier: there is no cross-tier
//! atomicity, so a failure on one tier can leave new settings next to an
//! old image (or vice versa). That trade-off is accepted; failures are
//! logged and never surfaced to mutation callers.

use std::sync::Arc;

use log::{info, warn};
use serde_json::Value;

use super::{KEY_BG_IMAGE, KEY_PREFERENCES, KEY_SHORTCUTS, StorageTier};
use crate::models::{Preferences, Shortcut};

/// The result of a load: always usable, never an error
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub shortcuts: Vec<Shortcut>,
    pub preferences: Preferences,
}

/// Adapter over the two storage tiers, applying the migration and merge
/// policy on load and the blob split on save
pub struct PersistentStore {
    synced: Arc<dyn StorageTier>,
    local: Arc<dyn StorageTier>,
}

impl PersistentStore {
    /// Create a store over the given synced and local tiers
    pub fn new(synced: Arc<dyn StorageTier>, local: Arc<dyn StorageTier>) -> Self {
        Self { synced, local }
    }

    /// Load shortcuts and preferences, reconciling both tiers.
    ///
    /// Never fails the caller: unreadable records degrade to defaults.
    /// On a fresh install the built-in default shortcuts are persisted
    /// immediately so the next load takes the normal path; likewise a
    /// legacy migration re-populates the synced tier right away.
    pub fn load(&self) -> LoadedData {
        if !self.synced.is_available() && !self.local.is_available() {
            info!("No storage backend available, using built-in defaults");
            return LoadedData {
                shortcuts: Shortcut::defaults(),
                preferences: Preferences::default(),
            };
        }

        let synced_shortcuts = self.get_soft(&self.synced, "synced", KEY_SHORTCUTS);
        let synced_prefs = self.get_soft(&self.synced, "synced", KEY_PREFERENCES);
        let local_shortcuts = self.get_soft(&self.local, "local", KEY_SHORTCUTS);
        let local_prefs = self.get_soft(&self.local, "local", KEY_PREFERENCES);

        // One-time migration: a legacy install wrote only to the local tier
        let migrating = synced_shortcuts.is_none()
            && synced_prefs.is_none()
            && (local_shortcuts.is_some() || local_prefs.is_some());

        let (chosen_shortcuts, chosen_prefs) = if migrating {
            info!("Synced tier is empty, migrating legacy local-tier data");
            (local_shortcuts, local_prefs)
        } else {
            (synced_shortcuts, synced_prefs)
        };

        let mut preferences = Preferences::default();
        if let Some(value) = &chosen_prefs {
            preferences.merge_value(value);
        }
        if !migrating {
            // The blob is never trusted from the synced tier
            preferences.bg_image = None;
        }
        if let Some(Value::String(blob)) = self.get_soft(&self.local, "local", KEY_BG_IMAGE) {
            preferences.bg_image = Some(blob);
        }

        let (shortcuts, fresh_install) = match chosen_shortcuts.and_then(parse_shortcuts) {
            Some(shortcuts) => (shortcuts, false),
            None => (Shortcut::defaults(), true),
        };

        if fresh_install || migrating {
            self.save(&shortcuts, &preferences);
        }

        LoadedData {
            shortcuts,
            preferences,
        }
    }

    /// Persist shortcuts and preferences, splitting the image blob out to
    /// the local tier. Best-effort: failures are logged, not returned, and
    /// the two tier writes are independent.
    pub fn save(&self, shortcuts: &[Shortcut], preferences: &Preferences) {
        match serde_json::to_value(shortcuts) {
            Ok(value) => self.set_soft(&self.synced, "synced", KEY_SHORTCUTS, &value),
            Err(e) => warn!("Failed to serialize shortcuts: {}", e),
        }

        match serde_json::to_value(preferences.without_bg_image()) {
            Ok(value) => self.set_soft(&self.synced, "synced", KEY_PREFERENCES, &value),
            Err(e) => warn!("Failed to serialize preferences: {}", e),
        }

        let blob = preferences
            .bg_image
            .clone()
            .map_or(Value::Null, Value::String);
        self.set_soft(&self.local, "local", KEY_BG_IMAGE, &blob);
    }

    /// Read a record, treating an unreadable tier as empty
    fn get_soft(&self, tier: &Arc<dyn StorageTier>, name: &str, key: &str) -> Option<Value> {
        match tier.get(key) {
            Ok(Some(Value::Null)) | Ok(None) => None,
            Ok(Some(value)) => Some(value),
            Err(e) => {
                warn!("Failed to read '{}' from the {} tier: {:#}", key, name, e);
                None
            }
        }
    }

    fn set_soft(&self, tier: &Arc<dyn StorageTier>, name: &str, key: &str, value: &Value) {
        if let Err(e) = tier.set(key, value) {
            warn!("Failed to write '{}' to the {} tier: {:#}", key, name, e);
        }
    }
}

fn parse_shortcuts(value: Value) -> Option<Vec<Shortcut>> {
    match serde_json::from_value(value) {
        Ok(shortcuts) => Some(shortcuts),
        Err(e) => {
            warn!("Stored shortcut list is malformed, starting over: {}", e);
            None
        }
    }
}
