//! # AutoPrefs
//!
//! Typed preference bindings over a key-value store.
//!
//! ## Overview
//!
//! AutoPrefs turns "read key X from the settings store, fall back to a
//! default, parse it" into one accessor object per field:
//!
//! - **Scalars**: [`AutoPrefs::string`], [`AutoPrefs::int`], [`AutoPrefs::boolean`]
//! - **Structured values**: [`AutoPrefs::json`] stores any serde type as JSON
//! - **Durable writes**: [`AutoPrefs::durable_string`] blocks until committed
//!
//! Bindings hold no cache. Every `get` reads the store, every `set` writes it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use autoprefs::AutoPrefs;
//! use autoprefs::store::SqliteProvider;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Profile {
//!     name: String,
//!     age: i32,
//! }
//!
//! fn example() -> autoprefs::Result<()> {
//!     let provider = SqliteProvider::new("prefs")?;
//!     let prefs = AutoPrefs::create(&provider, "user_settings")?;
//!
//!     let login_count = prefs.int("login_count", 0);
//!     login_count.set(login_count.get()? + 1)?;
//!
//!     let profile = prefs.json("profile", Profile { name: "Guest".into(), age: 0 });
//!     profile.set(Profile { name: "Alice".into(), age: 30 })?;
//!
//!     // Blocks until the value is on disk.
//!     prefs.durable_string("last_login", "").set("2024-05-01T10:00:00Z")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `autoprefs::store` - The storage crate (providers, stores, values)

pub mod codec;
pub mod error;
pub mod pref;
pub mod prefs;

pub use autoprefs_store as store;

pub use codec::{Codec, Json, Native};
pub use error::{PrefsError, Result};
pub use pref::{
    BoolPref, DurablePref, DurableStringPref, IntPref, JsonPref, Pref, StringPref,
};
pub use prefs::{AutoPrefs, DEFAULT_NAMESPACE};
