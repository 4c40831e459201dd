//! Domain models for shortcuts, preferences, and snapshots

mod preferences;
mod shortcut;
mod snapshot;

pub use preferences::{Attribution, Layout, Preferences, Theme, WeatherUnit};
pub use shortcut::{Shortcut, favicon_url, normalize_url};
pub use snapshot::{EXPORT_FILENAME, Snapshot};
