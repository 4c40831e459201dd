//! Watch-set derivation from the shortcut list
//!
//! Pure functions that can be tested without storage or network
//! dependencies.

use std::collections::BTreeSet;

use url::Url;

use crate::models::Shortcut;

/// Host whose shortcuts contribute webmail account indices
pub const WEBMAIL_HOST: &str = "mail.google.com";

/// Compute the set of webmail account indices to poll from the current
/// shortcut list.
///
/// Every shortcut whose URL host is [`WEBMAIL_HOST`] contributes one
/// index: the `<digits>` of a `/u/<digits>/` path segment when present,
/// otherwise account 0. Duplicates collapse; order is irrelevant; a
/// shortcut whose URL fails to parse contributes nothing.
pub fn derive_watch_set(shortcuts: &[Shortcut]) -> BTreeSet<u32> {
    let mut indices = BTreeSet::new();
    for shortcut in shortcuts {
        let Ok(parsed) = Url::parse(&shortcut.url) else {
            continue;
        };
        if parsed.host_str() != Some(WEBMAIL_HOST) {
            continue;
        }
        indices.insert(account_index(&parsed));
    }
    indices
}

/// Extract the account index from a webmail URL path.
///
/// Only a closed `/u/<digits>/` segment counts; a trailing `/u/<digits>`
/// with nothing after it falls back to account 0.
fn account_index(url: &Url) -> u32 {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.collect())
        .unwrap_or_default();
    for window in segments.windows(3) {
        if window[0] == "u" {
            if let Ok(index) = window[1].parse::<u32>() {
                return index;
            }
        }
    }
    0
}
