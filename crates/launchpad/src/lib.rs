//! Launchpad - persistence and polling core for a personal start page
//!
//! This crate provides the stateful parts of a browser start page:
//! - Domain models (Shortcut, Preferences, Snapshot)
//! - Dual-tier key-value persistence with one-time legacy migration and
//!   large-blob splitting
//! - The authoritative in-memory state, mutated through explicit intents
//! - A background poller delivering per-account webmail unread counts
//! - The pure watch-set derivation keeping poller targets in sync with
//!   the shortcut list
//!
//! Rendering, dialogs and widgets are left to the embedding UI, which
//! calls the mutation intents and subscribes to poller updates.

pub mod models;
pub mod poller;
pub mod service;
pub mod state;
pub mod storage;
pub mod watch;

pub use models::{
    Attribution, EXPORT_FILENAME, Layout, Preferences, Shortcut, Snapshot, Theme, WeatherUnit,
    favicon_url, normalize_url,
};
pub use poller::{
    CountCallback, CountMap, DEFAULT_POLL_INTERVAL, FeedError, GmailFeed, InboxPoller,
    UnreadSource,
};
pub use service::Launchpad;
pub use state::{AppState, PreferenceUpdate, StateError};
pub use storage::{
    FileTier, KEY_BG_IMAGE, KEY_PREFERENCES, KEY_SHORTCUTS, LoadedData, MemoryTier,
    PersistentStore, StorageTier,
};
pub use watch::{WEBMAIL_HOST, derive_watch_set};
