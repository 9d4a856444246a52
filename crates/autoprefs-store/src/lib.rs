//! # AutoPrefs Store
//!
//! Key-value storage for AutoPrefs. Provides a trait-based interface for
//! named preference namespaces with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! Every namespace is a flat map from string keys to scalar [`Value`]s
//! (string, integer, boolean). The adapter in the `autoprefs` crate only ever
//! talks to the [`KvStore`] trait, so it does not care where the bytes live.
//! The primary implementation is [`SqliteStore`], with [`MemoryStore`] for
//! testing.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The trait for all storage operations on one namespace
//! - [`StoreProvider`] - Hands out one shared handle per namespace name
//! - [`SqliteStore`] / [`SqliteProvider`] - SQLite-based persistent storage
//! - [`MemoryStore`] / [`MemoryProvider`] - In-memory storage for tests
//! - [`Value`] - A stored scalar
//!
//! ## Usage
//!
//! ```rust,no_run
//! use autoprefs_store::{KvStore, SqliteProvider, StoreExt, StoreProvider, Value};
//!
//! fn example() -> autoprefs_store::Result<()> {
//!     // One database file per namespace under this directory
//!     let provider = SqliteProvider::new("prefs")?;
//!     let store = provider.open("user_settings")?;
//!
//!     // Buffered write: visible immediately, flushed whenever SQLite gets to it
//!     store.put("username", Value::from("JohnDoe"))?;
//!
//!     // Durable write: returns only once the commit is on stable storage
//!     store.put_durable("last_login", Value::from("2024-01-01T00:00:00Z"))?;
//!
//!     assert_eq!(store.get_string("username")?.as_deref(), Some("JohnDoe"));
//!     Ok(())
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Untyped keys**: a key holds whatever kind was last written to it.
//!   Typed reads of the wrong kind fail with [`StoreError::TypeMismatch`].
//! - **Two write paths**: `put` is buffered, `put_durable` blocks until the
//!   commit is synced.
//! - **Shared handles**: providers cache handles, so every adapter built on
//!   the same namespace sees the same store.

pub mod config;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;
pub mod value;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use memory::{MemoryProvider, MemoryStore};
pub use sqlite::{SqliteProvider, SqliteStore};
pub use traits::{validate_namespace, KvStore, StoreExt, StoreProvider};
pub use value::{Value, ValueKind};
