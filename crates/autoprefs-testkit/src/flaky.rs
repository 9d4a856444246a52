//! A store double that fails on request.
//!
//! Wraps any [`KvStore`] and passes calls through until told to fail a class
//! of operation. Used to check that errors reach the caller untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use autoprefs_store::{KvStore, MemoryStore, Result, StoreError, Value};

/// A [`KvStore`] wrapper with switchable failures.
pub struct FlakyStore {
    inner: Arc<dyn KvStore>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_durable: AtomicBool,
}

impl FlakyStore {
    /// Wrap an existing store.
    pub fn new(inner: Arc<dyn KvStore>) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_durable: AtomicBool::new(false),
        }
    }

    /// Wrap a fresh [`MemoryStore`].
    pub fn memory(namespace: &str) -> Self {
        Self::new(Arc::new(MemoryStore::new(namespace)))
    }

    /// Make reads (`get`, `contains`, `keys`) fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make buffered writes, removals and clears fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make durable writes fail without touching the stored value.
    pub fn fail_durable(&self, fail: bool) {
        self.fail_durable.store(fail, Ordering::SeqCst);
    }

    /// The wrapped store, for inspecting state behind the failures.
    pub fn inner(&self) -> &Arc<dyn KvStore> {
        &self.inner
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            tracing::debug!(operation = what, "injected store failure");
            return Err(StoreError::Unavailable(format!("injected {what} failure")));
        }
        Ok(())
    }
}

impl KvStore for FlakyStore {
    fn namespace(&self) -> &str {
        self.inner.namespace()
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.get(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.contains(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.keys()
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.put(key, value)
    }

    fn put_durable(&self, key: &str, value: Value) -> Result<()> {
        Self::check(&self.fail_durable, "durable write")?;
        self.inner.put_durable(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.remove(key)
    }

    fn clear(&self) -> Result<()> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.clear()
    }
}
