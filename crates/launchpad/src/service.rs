//! Startup wiring facade
//!
//! Builds the storage tiers, loads state, derives the initial watch set,
//! and keeps the poller's targets in sync with shortcut edits. UI code
//! owns a `Launchpad`, mutates through `state_mut()`, and subscribes to
//! unread counts via `start_polling`.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use log::info;

use crate::poller::{CountCallback, DEFAULT_POLL_INTERVAL, GmailFeed, InboxPoller, UnreadSource};
use crate::state::AppState;
use crate::storage::{FileTier, MemoryTier, PersistentStore};

/// The assembled start-page core: state plus poller, wired together
pub struct Launchpad {
    state: AppState,
    poller: Arc<Mutex<InboxPoller>>,
}

impl Launchpad {
    /// Open with file-backed tiers in the standard config directory
    pub fn open() -> Result<Self> {
        let dir = config::ensure_config_dir()?;
        Self::open_in(&dir)
    }

    /// Open with file-backed tiers in the given directory
    pub fn open_in(dir: &Path) -> Result<Self> {
        let synced = Arc::new(FileTier::synced_in(dir)?);
        let local = Arc::new(FileTier::local_in(dir)?);
        info!("Opening launchpad storage in {}", dir.display());
        Ok(Self::assemble(
            PersistentStore::new(synced, local),
            Arc::new(GmailFeed::new()),
        ))
    }

    /// Pure-memory fallback for hosts without a storage backend.
    ///
    /// State starts from built-in defaults and nothing survives the
    /// process.
    pub fn without_storage() -> Self {
        Self::assemble(
            PersistentStore::new(
                Arc::new(MemoryTier::unavailable()),
                Arc::new(MemoryTier::unavailable()),
            ),
            Arc::new(GmailFeed::new()),
        )
    }

    /// Assemble from explicit parts (tests inject memory tiers and a
    /// scripted count source here)
    pub fn assemble(store: PersistentStore, source: Arc<dyn UnreadSource>) -> Self {
        let mut state = AppState::load(store);
        let poller = Arc::new(Mutex::new(InboxPoller::new(source)));

        poller.lock().unwrap().set_indices(state.watch_set());

        let poller_handle = poller.clone();
        state.set_watch_listener(Box::new(move |indices| {
            poller_handle.lock().unwrap().set_indices(indices.clone());
        }));

        Self { state, poller }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Start polling unread counts at the default five-minute interval
    pub fn start_polling(&self, callback: CountCallback) {
        self.start_polling_with_interval(callback, DEFAULT_POLL_INTERVAL);
    }

    /// Start polling unread counts at a custom interval
    pub fn start_polling_with_interval(&self, callback: CountCallback, interval: Duration) {
        self.poller.lock().unwrap().start(callback, interval);
    }

    /// Stop polling; idempotent
    pub fn stop_polling(&self) {
        self.poller.lock().unwrap().stop();
    }
}
