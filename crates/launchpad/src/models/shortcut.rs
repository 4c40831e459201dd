//! Shortcut model and URL helpers

use serde::{Deserialize, Serialize};
use url::Url;

/// A single start-page shortcut: a display name and an absolute URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub name: String,
    pub url: String,
}

impl Shortcut {
    /// Create a new shortcut with the given name and URL
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The built-in shortcut pair used on first run
    pub fn defaults() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Google", "https://google.com"),
            Shortcut::new("YouTube", "https://youtube.com"),
        ]
    }
}

/// Normalize a user-entered URL.
///
/// Trims whitespace; an empty result stays empty; a URL without an
/// `http://` or `https://` prefix gets `https://` prepended; anything
/// else passes through unchanged.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return format!("https://{}", url);
    }
    url.to_string()
}

/// Favicon URL for a shortcut's host, for UI callers.
///
/// Returns None when the URL has no parsable host.
pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("https://icons.duckduckgo.com/ip3/{}.ico", host))
}
