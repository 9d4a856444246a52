//! Store traits: the abstract interface for preference persistence.
//!
//! These traits allow the adapter to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::value::{Value, ValueKind};

/// One named key-value namespace.
///
/// All methods are synchronous. Implementations do their own locking, so a
/// single handle can be shared by any number of bindings and threads.
///
/// # Design Notes
///
/// - **Buffered writes**: [`put`](KvStore::put) returns as soon as the write
///   is visible to readers. When it reaches stable storage is up to the store.
/// - **Durable writes**: [`put_durable`](KvStore::put_durable) does not return
///   until the store has confirmed the commit is on stable storage. It blocks
///   the calling thread and should be kept off latency-sensitive paths.
/// - **Last write wins**: concurrent writers to one key race; whichever lands
///   last is what readers see.
pub trait KvStore: Send + Sync {
    /// The namespace this store was opened for.
    fn namespace(&self) -> &str;

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Check whether `key` holds a value.
    fn contains(&self, key: &str) -> Result<bool>;

    /// All keys in the namespace, sorted.
    fn keys(&self) -> Result<Vec<String>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Store `value` under `key` on the buffered path.
    fn put(&self, key: &str, value: Value) -> Result<()>;

    /// Store `value` under `key` and block until it is committed.
    ///
    /// A failed commit is returned as an error and is not retried.
    fn put_durable(&self, key: &str, value: Value) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key in the namespace.
    fn clear(&self) -> Result<()>;
}

/// Typed reads on top of [`KvStore`].
///
/// A key holding a different kind than requested is a
/// [`StoreError::TypeMismatch`], never a silent default.
pub trait StoreExt: KvStore {
    /// Get a string value.
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key)? {
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch(key, ValueKind::String, &other)),
            None => Ok(None),
        }
    }

    /// Get an integer value.
    fn get_int(&self, key: &str) -> Result<Option<i32>> {
        match self.get(key)? {
            Some(Value::Int(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Int, &other)),
            None => Ok(None),
        }
    }

    /// Get a boolean value.
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key)? {
            Some(Value::Bool(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Bool, &other)),
            None => Ok(None),
        }
    }
}

impl<S: KvStore + ?Sized> StoreExt for S {}

fn mismatch(key: &str, expected: ValueKind, found: &Value) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Opens namespaces by name.
///
/// Opening the same name twice returns the same handle, so everything built
/// on a namespace shares one store. Different names never see each other's
/// keys.
pub trait StoreProvider: Send + Sync {
    /// Open (or create) the store for `namespace`.
    fn open(&self, namespace: &str) -> Result<Arc<dyn KvStore>>;
}

/// Check that a namespace name can be used to address a store.
///
/// Names end up in file names, so they must be non-empty, must not contain
/// path separators or NUL, and must not be `.` or `..`.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    let bad = namespace.is_empty()
        || namespace == "."
        || namespace == ".."
        || namespace.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::InvalidNamespace(namespace.to_string()));
    }
    Ok(())
}
