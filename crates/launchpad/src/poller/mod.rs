//! Periodic unread-count poller
//!
//! Runs on a dedicated background thread. Each cycle fetches every watched
//! account index concurrently, joins all fetches, and delivers one
//! aggregated map to the subscriber callback. The map replaces the
//! previous one wholesale; an absent index means "count unknown this
//! cycle", not zero.
//!
//! The worker is a serial loop (run a cycle, then wait for the interval or
//! a control message), so cycles can never overlap: a slow cycle delays
//! the next tick instead of racing it.

mod feed;

pub use feed::{FeedError, GmailFeed, UnreadSource};

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, warn};

/// Default polling interval (5 minutes)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// One cycle's aggregated result: account index to unread count
pub type CountMap = HashMap<u32, u64>;

/// Subscriber callback invoked exactly once per poll cycle
pub type CountCallback = Box<dyn Fn(CountMap) + Send + 'static>;

enum Control {
    SetIndices(BTreeSet<u32>),
    Stop,
}

struct Worker {
    control: mpsc::Sender<Control>,
    handle: JoinHandle<()>,
}

/// Poller with two states: Idle (no worker) and Polling (worker thread
/// running with a fixed watch set and callback)
pub struct InboxPoller {
    source: Arc<dyn UnreadSource>,
    indices: BTreeSet<u32>,
    worker: Option<Worker>,
}

impl InboxPoller {
    /// Create an idle poller over the given count source
    pub fn new(source: Arc<dyn UnreadSource>) -> Self {
        Self {
            source,
            indices: BTreeSet::new(),
            worker: None,
        }
    }

    /// Whether a worker is currently running
    pub fn is_polling(&self) -> bool {
        self.worker.is_some()
    }

    /// The watch set the next (or current) cycle uses
    pub fn indices(&self) -> &BTreeSet<u32> {
        &self.indices
    }

    /// Transition to Polling: run one cycle immediately, then one per
    /// `interval`.
    ///
    /// Re-entrant: an existing worker is stopped and joined first, so at
    /// most one worker ever runs and the last caller's callback wins.
    pub fn start(&mut self, callback: CountCallback, interval: Duration) {
        self.stop();

        let (control_tx, control_rx) = mpsc::channel();
        let source = self.source.clone();
        let indices = self.indices.clone();
        let spawned = thread::Builder::new()
            .name("inbox-poller".to_string())
            .spawn(move || worker_loop(source, indices, callback, interval, control_rx));

        match spawned {
            Ok(handle) => {
                self.worker = Some(Worker {
                    control: control_tx,
                    handle,
                });
            }
            Err(e) => error!("Failed to spawn inbox poller thread: {}", e),
        }
    }

    /// Replace the watch set.
    ///
    /// While Polling the worker runs a fresh cycle immediately with the
    /// new set instead of waiting for the next tick; while Idle only the
    /// stored set changes.
    pub fn set_indices(&mut self, indices: BTreeSet<u32>) {
        self.indices = indices.clone();
        if let Some(worker) = &self.worker {
            if worker.control.send(Control::SetIndices(indices)).is_err() {
                warn!("Inbox poller worker is gone, dropping watch-set update");
            }
        }
    }

    /// Transition to Idle, joining the worker. Idempotent.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.control.send(Control::Stop);
            if worker.handle.join().is_err() {
                warn!("Inbox poller worker panicked");
            }
        }
    }
}

impl Drop for InboxPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(
    source: Arc<dyn UnreadSource>,
    mut indices: BTreeSet<u32>,
    callback: CountCallback,
    interval: Duration,
    control: mpsc::Receiver<Control>,
) {
    loop {
        let counts = poll_cycle(source.as_ref(), &indices);
        callback(counts);

        // The interval wait doubles as the control channel: stop and
        // watch-set updates interrupt it immediately.
        match control.recv_timeout(interval) {
            Ok(Control::SetIndices(new_indices)) => indices = new_indices,
            Ok(Control::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}

/// Fetch every watched index concurrently and join all results.
///
/// Failed fetches are omitted from the map; a confirmed zero is inserted
/// as 0. Never fails: the worst case is an empty map.
fn poll_cycle(source: &dyn UnreadSource, indices: &BTreeSet<u32>) -> CountMap {
    let mut counts = CountMap::new();
    thread::scope(|scope| {
        let fetches: Vec<_> = indices
            .iter()
            .map(|&index| scope.spawn(move || (index, source.unread_count(index))))
            .collect();
        for fetch in fetches {
            match fetch.join() {
                Ok((index, Ok(count))) => {
                    counts.insert(index, count);
                }
                Ok((index, Err(e))) => {
                    debug!("Unread count for account {} unavailable: {}", index, e);
                }
                Err(_) => warn!("Unread fetch thread panicked"),
            }
        }
    });
    counts
}
