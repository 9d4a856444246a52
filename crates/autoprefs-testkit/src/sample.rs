//! A sample settings consumer.
//!
//! `UserSettings` is what an application's settings layer looks like on top
//! of AutoPrefs: one binding per field, built once, with plain getters and
//! setters. `SettingsSnapshot` is the headless half of a settings screen. It
//! loads every field up front and saves them all at once, and a save only
//! counts as done when every write went through.

use autoprefs::store::StoreProvider;
use autoprefs::{
    AutoPrefs, BoolPref, DurableStringPref, IntPref, JsonPref, Result, StringPref,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Namespace the sample settings live in.
pub const SETTINGS_NAMESPACE: &str = "user_settings";

/// Structured profile stored as JSON under one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: i32,
    pub is_premium: bool,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, age: i32, is_premium: bool) -> Self {
        Self {
            name: name.into(),
            age,
            is_premium,
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new("Guest", 0, false)
    }
}

/// Application settings backed by one AutoPrefs namespace.
pub struct UserSettings {
    username: StringPref,
    dark_mode: BoolPref,
    font_size: IntPref,
    login_count: IntPref,
    first_run: BoolPref,
    profile: JsonPref<UserProfile>,
    last_login: DurableStringPref,
}

impl UserSettings {
    /// Open the settings namespace through `provider`.
    pub fn new<P>(provider: &P) -> Result<Self>
    where
        P: StoreProvider + ?Sized,
    {
        Ok(Self::from_prefs(&AutoPrefs::create(
            provider,
            SETTINGS_NAMESPACE,
        )?))
    }

    /// Build the bindings on an existing adapter.
    pub fn from_prefs(prefs: &AutoPrefs) -> Self {
        Self {
            username: prefs.string("username", "Guest"),
            dark_mode: prefs.boolean("dark_mode", false),
            font_size: prefs.int("font_size", 14),
            login_count: prefs.int("login_count", 0),
            first_run: prefs.boolean("is_first_run", true),
            profile: prefs.json("user_profile", UserProfile::default()),
            last_login: prefs.durable_string("last_login", ""),
        }
    }

    pub fn username(&self) -> Result<String> {
        self.username.get()
    }

    pub fn set_username(&self, name: &str) -> Result<()> {
        self.username.set(name)
    }

    pub fn is_dark_mode_enabled(&self) -> Result<bool> {
        self.dark_mode.get()
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.dark_mode.set(enabled)
    }

    pub fn font_size(&self) -> Result<i32> {
        self.font_size.get()
    }

    pub fn set_font_size(&self, size: i32) -> Result<()> {
        self.font_size.set(size)
    }

    pub fn login_count(&self) -> Result<i32> {
        self.login_count.get()
    }

    pub fn set_login_count(&self, count: i32) -> Result<()> {
        self.login_count.set(count)
    }

    pub fn is_first_run(&self) -> Result<bool> {
        self.first_run.get()
    }

    pub fn set_first_run(&self, first_run: bool) -> Result<()> {
        self.first_run.set(first_run)
    }

    pub fn profile(&self) -> Result<UserProfile> {
        self.profile.get()
    }

    pub fn set_profile(&self, profile: UserProfile) -> Result<()> {
        self.profile.set(profile)
    }

    /// Durably record a login at `at`, returning the stored timestamp.
    pub fn record_login_at(&self, at: DateTime<Utc>) -> Result<String> {
        let stamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.last_login.set(stamp.clone())?;
        Ok(stamp)
    }

    /// Durably record a login now.
    pub fn record_login(&self) -> Result<String> {
        self.record_login_at(Utc::now())
    }

    /// The raw stored login timestamp, empty if there never was one.
    pub fn last_login_time(&self) -> Result<String> {
        self.last_login.get()
    }
}

/// Every field a settings screen shows, read or written in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSnapshot {
    pub username: String,
    pub login_count: i32,
    pub is_first_run: bool,
    pub profile: UserProfile,
    pub last_login_time: String,
}

impl SettingsSnapshot {
    /// Read every field. Any failed read fails the whole load, so a screen
    /// never renders half-loaded data.
    pub fn load(settings: &UserSettings) -> Result<Self> {
        Ok(Self {
            username: settings.username()?,
            login_count: settings.login_count()?,
            is_first_run: settings.is_first_run()?,
            profile: settings.profile()?,
            last_login_time: settings.last_login_time()?,
        })
    }

    /// The values a screen resets its form to.
    pub fn reset(now: DateTime<Utc>) -> Self {
        Self {
            username: "Guest".to_string(),
            login_count: 0,
            is_first_run: true,
            profile: UserProfile::new("Guest", 18, false),
            last_login_time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Write every field, stamping the login time with `now`.
    ///
    /// Stops at the first failed write and returns its error; only an `Ok`
    /// means the snapshot was saved. The login time is written last, on the
    /// durable path.
    pub fn save(&mut self, settings: &UserSettings, now: DateTime<Utc>) -> Result<()> {
        settings.set_username(&self.username)?;
        settings.set_login_count(self.login_count)?;
        settings.set_first_run(self.is_first_run)?;
        settings.set_profile(self.profile.clone())?;
        self.last_login_time = settings.record_login_at(now)?;
        Ok(())
    }
}

/// Parse an age typed into a numeric text field. Anything that is not a
/// plain non-negative number reads as 0.
pub fn parse_age(text: &str) -> i32 {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    text.parse().unwrap_or(0)
}

/// Format a stored RFC 3339 timestamp for display, e.g.
/// `May 01, 2024 10:00:00`. Unparseable input is shown as-is.
pub fn format_login_time(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => t
            .with_timezone(&Utc)
            .format("%b %d, %Y %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
