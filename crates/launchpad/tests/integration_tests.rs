//! Integration tests for the launchpad crate
//!
//! These tests verify the complete flow: load (with migration), mutate,
//! reload, and poll with a scripted count source.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use launchpad::{
    FeedError, Launchpad, MemoryTier, PersistentStore, PreferenceUpdate, Shortcut, Theme,
    UnreadSource,
};
use serde_json::json;
use tempfile::TempDir;

/// Count source with fixed per-index outcomes
struct ScriptedSource {
    outcomes: HashMap<u32, Result<u64, FeedError>>,
}

impl ScriptedSource {
    fn new(outcomes: impl IntoIterator<Item = (u32, Result<u64, FeedError>)>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: outcomes.into_iter().collect(),
        })
    }
}

impl UnreadSource for ScriptedSource {
    fn unread_count(&self, index: u32) -> Result<u64, FeedError> {
        self.outcomes
            .get(&index)
            .cloned()
            .unwrap_or(Err(FeedError::UnknownAccount(index)))
    }
}

fn memory_launchpad(source: Arc<dyn UnreadSource>) -> Launchpad {
    let store = PersistentStore::new(Arc::new(MemoryTier::new()), Arc::new(MemoryTier::new()));
    Launchpad::assemble(store, source)
}

// Long enough that tests only observe explicitly triggered cycles
const PARKED: Duration = Duration::from_secs(600);

#[test]
fn test_first_run_then_reopen_with_file_tiers() {
    let dir = TempDir::new().unwrap();

    {
        let mut launchpad = Launchpad::open_in(dir.path()).unwrap();
        assert_eq!(launchpad.state().shortcuts(), Shortcut::defaults());

        launchpad
            .state_mut()
            .add_shortcut("Mail", "https://mail.google.com/mail/u/1/#inbox")
            .unwrap();
        launchpad
            .state_mut()
            .set_preference(PreferenceUpdate::Theme(Theme::Dark));
    }

    let launchpad = Launchpad::open_in(dir.path()).unwrap();
    assert_eq!(launchpad.state().shortcuts().len(), 3);
    assert_eq!(launchpad.state().preferences().theme, Theme::Dark);
    assert_eq!(launchpad.state().watch_set(), BTreeSet::from([1]));
}

#[test]
fn test_legacy_local_only_install_migrates_to_synced_tier() {
    let dir = TempDir::new().unwrap();

    // A legacy install wrote everything, image included, to the local tier
    std::fs::write(
        dir.path().join("local.json"),
        serde_json::to_string_pretty(&json!({
            "shortcuts": [{ "name": "A", "url": "https://a.com" }],
            "preferences": {
                "bgColor": "#334455",
                "bgImage": "data:image/png;base64,LEGACY"
            }
        }))
        .unwrap(),
    )
    .unwrap();

    let launchpad = Launchpad::open_in(dir.path()).unwrap();
    assert_eq!(
        launchpad.state().shortcuts(),
        &[Shortcut::new("A", "https://a.com")]
    );
    assert_eq!(launchpad.state().preferences().bg_color, "#334455");
    assert_eq!(
        launchpad.state().preferences().bg_image.as_deref(),
        Some("data:image/png;base64,LEGACY")
    );

    // The migration re-populated the synced tier with everything but the
    // blob, which stays local
    let synced: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("synced.json")).unwrap())
            .unwrap();
    assert_eq!(synced["shortcuts"][0]["name"], "A");
    assert_eq!(synced["preferences"]["bgColor"], "#334455");
    assert!(synced["preferences"].get("bgImage").is_none());

    let local: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("local.json")).unwrap())
            .unwrap();
    assert_eq!(local["bgImage"], "data:image/png;base64,LEGACY");
}

#[test]
fn test_background_image_stays_out_of_the_synced_tier() {
    let dir = TempDir::new().unwrap();

    {
        let mut launchpad = Launchpad::open_in(dir.path()).unwrap();
        launchpad
            .state_mut()
            .set_preference(PreferenceUpdate::BgImage(Some(
                "data:image/png;base64,WALLPAPER".to_string(),
            )));
    }

    let synced: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("synced.json")).unwrap())
            .unwrap();
    assert!(synced["preferences"].get("bgImage").is_none());

    let launchpad = Launchpad::open_in(dir.path()).unwrap();
    assert_eq!(
        launchpad.state().preferences().bg_image.as_deref(),
        Some("data:image/png;base64,WALLPAPER")
    );
}

#[test]
fn test_shortcut_edits_retarget_the_poller() {
    let source = ScriptedSource::new([(0, Ok(2)), (3, Ok(9))]);
    let mut launchpad = memory_launchpad(source);

    launchpad
        .state_mut()
        .add_shortcut("Mail", "https://mail.google.com/")
        .unwrap();

    let (tx, rx) = mpsc::channel();
    launchpad.start_polling_with_interval(
        Box::new(move |counts| {
            let _ = tx.send(counts);
        }),
        PARKED,
    );

    // Immediate cycle against the watch set from the shortcut edit above
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        HashMap::from([(0, 2)])
    );

    // Editing the shortcut retargets the poller without waiting a tick
    launchpad
        .state_mut()
        .update_shortcut(2, "Work mail", "https://mail.google.com/mail/u/3/")
        .unwrap();
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        HashMap::from([(3, 9)])
    );

    // Removing the webmail shortcut empties the watch set
    launchpad.state_mut().remove_shortcut(2).unwrap();
    assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap().is_empty());

    launchpad.stop_polling();
}

#[test]
fn test_per_account_failures_stay_soft() {
    let source = ScriptedSource::new([
        (0, Err(FeedError::NotAuthenticated(0))),
        (1, Ok(5)),
    ]);
    let mut launchpad = memory_launchpad(source);
    launchpad
        .state_mut()
        .add_shortcut("Mail", "https://mail.google.com/")
        .unwrap();
    launchpad
        .state_mut()
        .add_shortcut("Other mail", "https://mail.google.com/mail/u/1/")
        .unwrap();

    let (tx, rx) = mpsc::channel();
    launchpad.start_polling_with_interval(
        Box::new(move |counts| {
            let _ = tx.send(counts);
        }),
        PARKED,
    );

    let counts = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(counts, HashMap::from([(1, 5)]));
    launchpad.stop_polling();
}

#[test]
fn test_without_storage_degrades_to_defaults() {
    let mut launchpad = Launchpad::without_storage();
    assert_eq!(launchpad.state().shortcuts(), Shortcut::defaults());

    // Mutations still apply in memory
    launchpad.state_mut().remove_shortcut(0).unwrap();
    assert_eq!(launchpad.state().shortcuts().len(), 1);
}

#[test]
fn test_snapshot_export_imports_into_a_fresh_install() {
    let source = ScriptedSource::new(Vec::new());
    let mut first = memory_launchpad(source.clone());
    first
        .state_mut()
        .add_shortcut("Docs", "https://docs.example")
        .unwrap();
    first
        .state_mut()
        .set_preference(PreferenceUpdate::BgColor("#778899".to_string()));

    let exported = first.state().export_snapshot().to_json().unwrap();
    let document: serde_json::Value = serde_json::from_str(&exported).unwrap();

    let mut second = memory_launchpad(source);
    second.state_mut().import_snapshot(&document).unwrap();

    assert_eq!(second.state().shortcuts(), first.state().shortcuts());
    assert_eq!(second.state().preferences(), first.state().preferences());
}
