//! The sample settings consumer against real and failing stores.

use std::sync::Arc;

use autoprefs::store::{KvStore, StoreError, StoreProvider};
use autoprefs::{AutoPrefs, PrefsError};
use autoprefs_testkit::{
    FlakyStore, SettingsSnapshot, SqliteFixture, UserProfile, UserSettings, SETTINGS_NAMESPACE,
};
use chrono::{TimeZone, Utc};

#[test]
fn username_storage_survives_a_new_instance() {
    let fixture = SqliteFixture::new();
    let settings = UserSettings::new(&fixture.provider).unwrap();

    assert_eq!(settings.username().unwrap(), "Guest");
    settings.set_username("JohnDoe").unwrap();
    assert_eq!(settings.username().unwrap(), "JohnDoe");

    let fresh = UserSettings::new(&fixture.fresh_provider()).unwrap();
    assert_eq!(fresh.username().unwrap(), "JohnDoe");
}

#[test]
fn dark_mode_and_font_size() {
    let fixture = SqliteFixture::new();
    let settings = UserSettings::new(&fixture.provider).unwrap();

    assert!(!settings.is_dark_mode_enabled().unwrap());
    assert_eq!(settings.font_size().unwrap(), 14);

    settings.set_dark_mode(true).unwrap();
    settings.set_font_size(18).unwrap();

    let again = UserSettings::new(&fixture.provider).unwrap();
    assert!(again.is_dark_mode_enabled().unwrap());
    assert_eq!(again.font_size().unwrap(), 18);
}

#[test]
fn recorded_login_is_durable_and_parseable() {
    let fixture = SqliteFixture::new();
    let settings = UserSettings::new(&fixture.provider).unwrap();

    let stamp = settings.record_login().unwrap();
    assert!(!stamp.is_empty());
    assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());

    let fresh = UserSettings::new(&fixture.fresh_provider()).unwrap();
    assert_eq!(fresh.last_login_time().unwrap(), stamp);
}

#[test]
fn snapshot_save_then_load() {
    let fixture = SqliteFixture::new();
    let settings = UserSettings::new(&fixture.provider).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

    let mut snapshot = SettingsSnapshot::load(&settings).unwrap();
    snapshot.username = "AliceSmith".into();
    snapshot.login_count += 3;
    snapshot.is_first_run = false;
    snapshot.profile = UserProfile::new("Alice", 30, true);
    snapshot.save(&settings, now).unwrap();

    assert_eq!(snapshot.last_login_time, "2024-05-01T10:00:00.000Z");

    let fresh = UserSettings::new(&fixture.fresh_provider()).unwrap();
    assert_eq!(SettingsSnapshot::load(&fresh).unwrap(), snapshot);
}

#[test]
fn reset_values_save_like_any_other() {
    let fixture = SqliteFixture::new();
    let settings = UserSettings::new(&fixture.provider).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let mut reset = SettingsSnapshot::reset(now);
    reset.save(&settings, now).unwrap();

    let loaded = SettingsSnapshot::load(&settings).unwrap();
    assert_eq!(loaded.username, "Guest");
    assert_eq!(loaded.profile, UserProfile::new("Guest", 18, false));
    assert!(loaded.is_first_run);
}

#[test]
fn failed_durable_write_means_not_saved() {
    let store = Arc::new(FlakyStore::memory(SETTINGS_NAMESPACE));
    let settings = UserSettings::from_prefs(&AutoPrefs::from_store(store.clone()));
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

    let mut snapshot = SettingsSnapshot::load(&settings).unwrap();
    snapshot.username = "Bob".into();

    store.fail_durable(true);
    let err = snapshot.save(&settings, now).unwrap_err();
    assert!(matches!(err, PrefsError::Store(StoreError::Unavailable(_))));

    // The login stamp on the snapshot was not updated and nothing durable landed.
    assert_eq!(snapshot.last_login_time, "");
    assert_eq!(settings.last_login_time().unwrap(), "");
}

#[test]
fn failed_read_fails_the_whole_load() {
    let store = Arc::new(FlakyStore::memory(SETTINGS_NAMESPACE));
    let settings = UserSettings::from_prefs(&AutoPrefs::from_store(store.clone()));

    store.fail_reads(true);
    assert!(SettingsSnapshot::load(&settings).is_err());
}

#[test]
fn corrupt_profile_blocks_the_load() {
    let fixture = SqliteFixture::new();
    let store = fixture.provider.open(SETTINGS_NAMESPACE).unwrap();
    store
        .put("user_profile", "{\"name\": 12}".into())
        .unwrap();

    let settings = UserSettings::new(&fixture.provider).unwrap();
    assert!(matches!(
        settings.profile(),
        Err(PrefsError::Decode { .. })
    ));
    assert!(SettingsSnapshot::load(&settings).is_err());
}
