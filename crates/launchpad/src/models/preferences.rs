//! Preferences model: the flat settings record applied to the start page
//!
//! Field names on the wire are camelCase to match the persisted record
//! layout. Unknown fields are ignored and missing fields fall back to the
//! baseline defaults, so records written by older versions keep loading.

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Color theme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

/// Shortcut grid layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Grid,
    List,
    Minimal,
}

/// Temperature unit for the weather widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherUnit {
    Celsius,
    Fahrenheit,
}

/// Attribution for a background image sourced from an external image search
///
/// Only meaningful while `bgImage` is set and came from the image search;
/// it goes stale (but is not purged) when a local file replaces the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub name: String,
    pub username: String,
    pub link: String,
}

/// User preferences for the start page
///
/// `bg_image` is a potentially large data-URL blob; the persistence layer
/// keeps it out of the synced storage tier (see `storage::persist`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub bg_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_image: Option<String>,
    pub bg_attribution: Option<Attribution>,
    pub theme: Theme,
    pub layout: Layout,
    pub language: String,
    pub weather_enabled: bool,
    pub weather_city: Option<String>,
    pub weather_unit: WeatherUnit,
    pub unsplash_client_id: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            bg_color: "#1e1e1e".to_string(),
            bg_image: None,
            bg_attribution: None,
            theme: Theme::System,
            layout: Layout::Grid,
            language: "en".to_string(),
            weather_enabled: false,
            weather_city: None,
            weather_unit: WeatherUnit::Celsius,
            unsplash_client_id: None,
        }
    }
}

impl Preferences {
    /// Merge a stored or imported JSON object into these preferences,
    /// field by field.
    ///
    /// Only keys present in the object are applied; an explicit `null`
    /// clears a nullable field, while a value that doesn't fit the field's
    /// type (including `null` for a non-nullable field) is skipped rather
    /// than failing the whole merge. Non-object input is ignored.
    pub fn merge_value(&mut self, value: &Value) {
        let Some(obj) = value.as_object() else {
            return;
        };
        merge_field(obj, "bgColor", &mut self.bg_color);
        merge_field(obj, "bgImage", &mut self.bg_image);
        merge_field(obj, "bgAttribution", &mut self.bg_attribution);
        merge_field(obj, "theme", &mut self.theme);
        merge_field(obj, "layout", &mut self.layout);
        merge_field(obj, "language", &mut self.language);
        merge_field(obj, "weatherEnabled", &mut self.weather_enabled);
        merge_field(obj, "weatherCity", &mut self.weather_city);
        merge_field(obj, "weatherUnit", &mut self.weather_unit);
        merge_field(obj, "unsplashClientId", &mut self.unsplash_client_id);
    }

    /// A copy with the background image stripped, for synced-tier writes
    pub fn without_bg_image(&self) -> Self {
        Self {
            bg_image: None,
            ..self.clone()
        }
    }
}

fn merge_field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str, slot: &mut T) {
    if let Some(raw) = obj.get(key) {
        match serde_json::from_value::<T>(raw.clone()) {
            Ok(parsed) => *slot = parsed,
            Err(e) => debug!("Ignoring malformed preference field '{}': {}", key, e),
        }
    }
}
