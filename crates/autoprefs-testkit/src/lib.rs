//! # AutoPrefs Testkit
//!
//! Testing utilities for AutoPrefs.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: ready-made in-memory and SQLite-backed namespaces
//! - **Store doubles**: [`FlakyStore`] fails reads or writes on request
//! - **Generators**: Proptest strategies for keys, values and profiles
//! - **Sample consumer**: [`UserSettings`] and [`SettingsSnapshot`], a
//!   settings layer the way an application would write it
//!
//! ## Test Fixtures
//!
//! ```rust
//! use autoprefs_testkit::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.prefs.int("font_size", 14).set(18).unwrap();
//! assert_eq!(fixture.reopen().int("font_size", 14).get().unwrap(), 18);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use autoprefs_testkit::generators::{key, user_profile};
//!
//! proptest! {
//!     #[test]
//!     fn profile_round_trips(k in key(), p in user_profile()) {
//!         let fixture = TestFixture::new();
//!         let pref = fixture.prefs.json(k, UserProfile::default());
//!         pref.set(p.clone()).unwrap();
//!         prop_assert_eq!(pref.get().unwrap(), p);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod flaky;
pub mod generators;
pub mod sample;

pub use fixtures::{SqliteFixture, TestFixture};
pub use flaky::FlakyStore;
pub use sample::{
    format_login_time, parse_age, SettingsSnapshot, UserProfile, UserSettings, SETTINGS_NAMESPACE,
};
