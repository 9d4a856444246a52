//! Preference bindings: one accessor object per stored field.
//!
//! A binding is a (key, type, default) triple over a shared store handle. It
//! caches nothing: every [`get`](Pref::get) reads the store and every
//! [`set`](Pref::set) writes it, so changes made through another binding on
//! the same key, or by anything else holding the store, show up on the next
//! read.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use autoprefs_store::KvStore;

use crate::codec::{Codec, Json, Native};
use crate::error::Result;

/// A buffered string preference.
pub type StringPref = Pref<String>;
/// A buffered integer preference.
pub type IntPref = Pref<i32>;
/// A buffered boolean preference.
pub type BoolPref = Pref<bool>;
/// A buffered preference holding any serde type as JSON.
pub type JsonPref<T> = Pref<T, Json>;
/// A string preference whose writes block until committed.
pub type DurableStringPref = DurablePref<String>;

/// A typed binding to one key, written through the buffered path.
pub struct Pref<T, C = Native> {
    store: Arc<dyn KvStore>,
    key: String,
    default: T,
    _codec: PhantomData<fn() -> C>,
}

impl<T, C> Pref<T, C>
where
    T: Clone,
    C: Codec<T>,
{
    pub(crate) fn new(store: Arc<dyn KvStore>, key: String, default: T) -> Self {
        Self {
            store,
            key,
            default,
            _codec: PhantomData,
        }
    }

    /// The key this binding reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value [`get`](Self::get) returns while the key is unset.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Read the current value, or the default if the key was never written.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read, if the key holds a different kind
    /// of value, or (for JSON bindings) if the stored text does not decode.
    /// A present-but-corrupt value never falls back to the default.
    pub fn get(&self) -> Result<T> {
        match self.store.get(&self.key)? {
            Some(value) => C::decode(&self.key, value),
            None => Ok(self.default.clone()),
        }
    }

    /// Write `value` on the store's buffered path.
    pub fn set(&self, value: impl Into<T>) -> Result<()> {
        let encoded = C::encode(&self.key, &value.into())?;
        self.store.put(&self.key, encoded)?;
        Ok(())
    }

    /// Delete the key so reads return the default again.
    pub fn remove(&self) -> Result<()> {
        self.store.remove(&self.key)?;
        Ok(())
    }

    /// Whether the key currently holds a value.
    pub fn is_set(&self) -> Result<bool> {
        Ok(self.store.contains(&self.key)?)
    }
}

impl<T: Clone, C> Clone for Pref<T, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key.clone(),
            default: self.default.clone(),
            _codec: PhantomData,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Pref<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pref")
            .field("namespace", &self.store.namespace())
            .field("key", &self.key)
            .field("default", &self.default)
            .finish()
    }
}

/// A typed binding whose writes go through the store's durable path.
///
/// [`set`](Self::set) does not return until the store confirms the value is
/// on stable storage, so it blocks the calling thread. Keep it for rare
/// "must be recorded before we go on" writes, and use
/// [`set_async`](Self::set_async) from async code.
pub struct DurablePref<T, C = Native> {
    inner: Pref<T, C>,
}

impl<T, C> DurablePref<T, C>
where
    T: Clone,
    C: Codec<T>,
{
    pub(crate) fn new(store: Arc<dyn KvStore>, key: String, default: T) -> Self {
        Self {
            inner: Pref::new(store, key, default),
        }
    }

    /// The key this binding reads and writes.
    pub fn key(&self) -> &str {
        self.inner.key()
    }

    /// The value [`get`](Self::get) returns while the key is unset.
    pub fn default_value(&self) -> &T {
        self.inner.default_value()
    }

    /// Read the current value, or the default if the key was never written.
    pub fn get(&self) -> Result<T> {
        self.inner.get()
    }

    /// Write `value` and block until the store has committed it.
    ///
    /// # Errors
    ///
    /// A failed commit is returned as-is and not retried; the stored value is
    /// whatever the store kept.
    pub fn set(&self, value: impl Into<T>) -> Result<()> {
        let encoded = C::encode(&self.inner.key, &value.into())?;
        self.inner.store.put_durable(&self.inner.key, encoded)?;
        Ok(())
    }

    /// Run [`set`](Self::set) on tokio's blocking pool.
    ///
    /// Resolves once the commit is confirmed. Must be called from within a
    /// tokio runtime.
    pub async fn set_async(&self, value: impl Into<T>) -> Result<()>
    where
        T: Send + 'static,
        C: 'static,
    {
        let this = self.clone();
        let value = value.into();
        tokio::task::spawn_blocking(move || this.set(value)).await?
    }

    /// Delete the key so reads return the default again.
    pub fn remove(&self) -> Result<()> {
        self.inner.remove()
    }

    /// Whether the key currently holds a value.
    pub fn is_set(&self) -> Result<bool> {
        self.inner.is_set()
    }
}

impl<T: Clone, C> Clone for DurablePref<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for DurablePref<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DurablePref")
            .field("namespace", &self.inner.store.namespace())
            .field("key", &self.inner.key)
            .field("default", &self.inner.default)
            .finish()
    }
}
