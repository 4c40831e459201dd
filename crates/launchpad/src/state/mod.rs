//! Authoritative in-memory state for shortcuts and preferences
//!
//! All user edits flow through the mutation intents here: each applies to
//! memory synchronously (read-your-writes against this object), persists
//! best-effort through the dual-tier store, and notifies the watch-set
//! listener when the shortcut sequence changed.

use std::collections::BTreeSet;

use chrono::Utc;
use log::info;
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    Attribution, Layout, Preferences, Shortcut, Snapshot, Theme, WeatherUnit, normalize_url,
};
use crate::storage::PersistentStore;
use crate::watch::derive_watch_set;

/// Errors surfaced to mutation callers
///
/// An out-of-range index signals that the caller's view of the shortcut
/// sequence has drifted from this state; it is propagated, never clamped.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Shortcut index {index} is out of range ({len} shortcuts)")]
    OutOfRange { index: usize, len: usize },
    #[error("Shortcut name and URL must not be empty")]
    EmptyField,
    #[error("Snapshot document is not a JSON object")]
    MalformedSnapshot,
}

/// A typed single-field preference update
#[derive(Debug, Clone)]
pub enum PreferenceUpdate {
    BgColor(String),
    BgImage(Option<String>),
    BgAttribution(Option<Attribution>),
    Theme(Theme),
    Layout(Layout),
    Language(String),
    WeatherEnabled(bool),
    WeatherCity(Option<String>),
    WeatherUnit(WeatherUnit),
    UnsplashClientId(Option<String>),
}

type WatchListener = Box<dyn Fn(&BTreeSet<u32>) + Send>;

/// The single in-process owner of shortcuts and preferences
pub struct AppState {
    shortcuts: Vec<Shortcut>,
    preferences: Preferences,
    store: PersistentStore,
    watch_listener: Option<WatchListener>,
}

impl AppState {
    /// Load initial state through the given store
    pub fn load(store: PersistentStore) -> Self {
        let data = store.load();
        Self {
            shortcuts: data.shortcuts,
            preferences: data.preferences,
            store,
            watch_listener: None,
        }
    }

    /// Current shortcut sequence
    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    /// Current preferences
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Watch set derived from the current shortcuts
    pub fn watch_set(&self) -> BTreeSet<u32> {
        derive_watch_set(&self.shortcuts)
    }

    /// Register the listener notified with a freshly derived watch set
    /// after every shortcut-sequence mutation
    pub fn set_watch_listener(&mut self, listener: WatchListener) {
        self.watch_listener = Some(listener);
    }

    /// Apply a single preference field update and persist
    pub fn set_preference(&mut self, update: PreferenceUpdate) {
        match update {
            PreferenceUpdate::BgColor(color) => self.preferences.bg_color = color,
            PreferenceUpdate::BgImage(image) => self.preferences.bg_image = image,
            PreferenceUpdate::BgAttribution(attribution) => {
                self.preferences.bg_attribution = attribution
            }
            PreferenceUpdate::Theme(theme) => self.preferences.theme = theme,
            PreferenceUpdate::Layout(layout) => self.preferences.layout = layout,
            PreferenceUpdate::Language(language) => self.preferences.language = language,
            PreferenceUpdate::WeatherEnabled(enabled) => {
                self.preferences.weather_enabled = enabled
            }
            PreferenceUpdate::WeatherCity(city) => self.preferences.weather_city = city,
            PreferenceUpdate::WeatherUnit(unit) => self.preferences.weather_unit = unit,
            PreferenceUpdate::UnsplashClientId(id) => self.preferences.unsplash_client_id = id,
        }
        self.persist();
    }

    /// Append a new shortcut; the URL is normalized first
    pub fn add_shortcut(&mut self, name: &str, url: &str) -> Result<(), StateError> {
        let (name, url) = validated(name, url)?;
        info!("Adding shortcut '{}'", name);
        self.shortcuts.push(Shortcut::new(name, url));
        self.persist();
        self.notify_watch();
        Ok(())
    }

    /// Replace the shortcut at `index`
    pub fn update_shortcut(&mut self, index: usize, name: &str, url: &str) -> Result<(), StateError> {
        self.check_index(index)?;
        let (name, url) = validated(name, url)?;
        info!("Updating shortcut {} to '{}'", index, name);
        self.shortcuts[index] = Shortcut::new(name, url);
        self.persist();
        self.notify_watch();
        Ok(())
    }

    /// Remove the shortcut at `index`
    pub fn remove_shortcut(&mut self, index: usize) -> Result<(), StateError> {
        self.check_index(index)?;
        let removed = self.shortcuts.remove(index);
        info!("Removed shortcut '{}'", removed.name);
        self.persist();
        self.notify_watch();
        Ok(())
    }

    /// Move the shortcut at `from` to position `to`.
    ///
    /// `from == to` is a no-op that still persists.
    pub fn reorder_shortcut(&mut self, from: usize, to: usize) -> Result<(), StateError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let moved = self.shortcuts.remove(from);
            self.shortcuts.insert(to, moved);
            self.notify_watch();
        }
        self.persist();
        Ok(())
    }

    /// Import a previously exported snapshot document.
    ///
    /// Shortcuts are replaced wholesale when the field is a well-formed
    /// sequence; preferences are merged field by field. A malformed field
    /// is ignored rather than failing the import; only a non-object
    /// document is rejected, leaving state untouched.
    pub fn import_snapshot(&mut self, document: &Value) -> Result<(), StateError> {
        let Some(obj) = document.as_object() else {
            return Err(StateError::MalformedSnapshot);
        };

        let mut shortcuts_changed = false;
        if let Some(raw) = obj.get("shortcuts") {
            if let Ok(shortcuts) = serde_json::from_value::<Vec<Shortcut>>(raw.clone()) {
                self.shortcuts = shortcuts;
                shortcuts_changed = true;
            }
        }
        if let Some(raw) = obj.get("preferences") {
            self.preferences.merge_value(raw);
        }

        info!("Imported settings snapshot ({} shortcuts)", self.shortcuts.len());
        self.persist();
        if shortcuts_changed {
            self.notify_watch();
        }
        Ok(())
    }

    /// Deep copy of the current state for file export
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            shortcuts: self.shortcuts.clone(),
            preferences: self.preferences.clone(),
            timestamp: Utc::now(),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), StateError> {
        if index >= self.shortcuts.len() {
            return Err(StateError::OutOfRange {
                index,
                len: self.shortcuts.len(),
            });
        }
        Ok(())
    }

    fn persist(&self) {
        self.store.save(&self.shortcuts, &self.preferences);
    }

    fn notify_watch(&self) {
        if let Some(listener) = &self.watch_listener {
            listener(&derive_watch_set(&self.shortcuts));
        }
    }
}

fn validated(name: &str, url: &str) -> Result<(String, String), StateError> {
    let name = name.trim();
    let url = normalize_url(url);
    if name.is_empty() || url.is_empty() {
        return Err(StateError::EmptyField);
    }
    Ok((name.to_string(), url))
}
