//! End-to-end behaviour of bindings over SQLite-backed namespaces.
//!
//! Every test uses a fresh temporary directory, so "a new adapter" can mean
//! either a second adapter on the same provider or one built from a provider
//! that reopened the files from scratch.

use autoprefs::store::{KvStore, SqliteProvider, StoreError, StoreProvider, Value};
use autoprefs::{AutoPrefs, PrefsError};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    age: i32,
    premium: bool,
}

impl Profile {
    fn new(name: &str, age: i32, premium: bool) -> Self {
        Self {
            name: name.to_string(),
            age,
            premium,
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .try_init();
}

fn setup() -> (TempDir, SqliteProvider) {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let provider = SqliteProvider::new(dir.path()).unwrap();
    (dir, provider)
}

#[test]
fn username_defaults_then_persists() {
    let (dir, provider) = setup();

    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();
    let username = prefs.string("username", "Guest");
    assert_eq!(username.get().unwrap(), "Guest");

    username.set("JohnDoe").unwrap();

    let same_provider = AutoPrefs::create(&provider, "user_settings").unwrap();
    assert_eq!(
        same_provider.string("username", "Guest").get().unwrap(),
        "JohnDoe"
    );

    drop((prefs, same_provider, provider));
    let reopened = SqliteProvider::new(dir.path()).unwrap();
    let prefs = AutoPrefs::create(&reopened, "user_settings").unwrap();
    assert_eq!(prefs.string("username", "Guest").get().unwrap(), "JohnDoe");
}

#[test]
fn font_size_default_and_update() {
    let (_dir, provider) = setup();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();

    let font_size = prefs.int("font_size", 14);
    assert_eq!(font_size.get().unwrap(), 14);

    font_size.set(18).unwrap();
    assert_eq!(font_size.get().unwrap(), 18);
}

#[test]
fn dark_mode_toggle_persists() {
    let (_dir, provider) = setup();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();

    let dark = prefs.boolean("dark_mode", false);
    assert!(!dark.get().unwrap());
    dark.set(true).unwrap();

    let again = AutoPrefs::create(&provider, "user_settings").unwrap();
    assert!(again.boolean("dark_mode", false).get().unwrap());
}

#[test]
fn json_profile_round_trips() {
    let (_dir, provider) = setup();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();

    let profile = prefs.json("profile", Profile::new("Guest", 0, false));
    assert_eq!(profile.get().unwrap(), Profile::new("Guest", 0, false));

    profile.set(Profile::new("Alice", 30, true)).unwrap();
    assert_eq!(profile.get().unwrap(), Profile::new("Alice", 30, true));

    // Stored as a plain JSON string under the one key.
    let raw = prefs.store().get("profile").unwrap().unwrap();
    let text = raw.as_str().unwrap();
    let decoded: Profile = serde_json::from_str(text).unwrap();
    assert_eq!(decoded, Profile::new("Alice", 30, true));
}

#[test]
fn malformed_json_is_an_error_not_the_default() {
    let (_dir, provider) = setup();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();

    prefs.string("profile", "").set("{\"name\": \"Alice\", ").unwrap();

    let profile = prefs.json("profile", Profile::new("Guest", 0, false));
    match profile.get() {
        Err(PrefsError::Decode { key, .. }) => assert_eq!(key, "profile"),
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[test]
fn json_binding_over_non_string_value_is_a_mismatch() {
    let (_dir, provider) = setup();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();

    prefs.int("profile", 0).set(5).unwrap();

    let profile = prefs.json("profile", Profile::new("Guest", 0, false));
    assert!(matches!(
        profile.get(),
        Err(PrefsError::Store(StoreError::TypeMismatch { .. }))
    ));
}

#[test]
fn durable_write_is_visible_to_a_fresh_provider_immediately() {
    let (dir, provider) = setup();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();

    let last_login = prefs.durable_string("last_login", "");
    assert_eq!(last_login.get().unwrap(), "");
    last_login.set("2024-05-01T10:00:00Z").unwrap();

    // Second connection while the first is still open.
    let other = SqliteProvider::new(dir.path()).unwrap();
    let fresh = AutoPrefs::create(&other, "user_settings").unwrap();
    assert_eq!(
        fresh.durable_string("last_login", "").get().unwrap(),
        "2024-05-01T10:00:00Z"
    );
}

#[tokio::test]
async fn durable_set_async_commits_before_resolving() {
    let (dir, provider) = setup();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();

    prefs
        .durable_string("last_sync", "Never")
        .set_async("2024-05-02T08:30:00Z")
        .await
        .unwrap();

    let other = SqliteProvider::new(dir.path()).unwrap();
    let store = other.open("user_settings").unwrap();
    assert_eq!(
        store.get("last_sync").unwrap(),
        Some(Value::from("2024-05-02T08:30:00Z"))
    );
}

#[test]
fn namespaces_do_not_share_keys() {
    let (_dir, provider) = setup();
    let a = AutoPrefs::create(&provider, "first").unwrap();
    let b = AutoPrefs::create(&provider, "second").unwrap();

    a.string("username", "Guest").set("Alice").unwrap();
    assert_eq!(b.string("username", "Guest").get().unwrap(), "Guest");
}

#[test]
fn multiple_changes_all_persist() {
    let (dir, provider) = setup();
    {
        let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();
        prefs.string("username", "Guest").set("AliceSmith").unwrap();
        prefs.boolean("dark_mode", false).set(true).unwrap();
        prefs.int("font_size", 14).set(16).unwrap();
    }
    drop(provider);

    let provider = SqliteProvider::new(dir.path()).unwrap();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();
    assert_eq!(prefs.string("username", "Guest").get().unwrap(), "AliceSmith");
    assert!(prefs.boolean("dark_mode", false).get().unwrap());
    assert_eq!(prefs.int("font_size", 14).get().unwrap(), 16);
}

#[test]
fn remove_then_read_yields_default() {
    let (_dir, provider) = setup();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();

    let username = prefs.string("username", "Guest");
    username.set("JohnDoe").unwrap();
    assert!(username.is_set().unwrap());

    username.remove().unwrap();
    assert!(!username.is_set().unwrap());
    assert_eq!(username.get().unwrap(), "Guest");
}

#[test]
fn bindings_shared_across_threads() {
    let (dir, provider) = setup();
    let prefs = AutoPrefs::create(&provider, "user_settings").unwrap();
    let login_count = prefs.int("login_count", 0);
    let last_login = prefs.durable_string("last_login", "");

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let login_count = login_count.clone();
            let last_login = last_login.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    login_count.set(t * 100 + i).unwrap();
                    last_login.set(format!("thread {t} write {i}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Last write wins: whatever landed is one thread's final write.
    let count = login_count.get().unwrap();
    assert_eq!(count % 100, 24);
    let stamp = last_login.get().unwrap();
    assert!(stamp.ends_with("write 24"));

    drop((prefs, login_count, last_login, provider));
    let reopened = SqliteProvider::new(dir.path()).unwrap();
    let prefs = AutoPrefs::create(&reopened, "user_settings").unwrap();
    assert_eq!(prefs.int("login_count", 0).get().unwrap(), count);
    assert_eq!(prefs.durable_string("last_login", "").get().unwrap(), stamp);
}
