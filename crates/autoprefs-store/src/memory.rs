//! In-memory implementation of the store traits.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{Result, StoreError};
use crate::traits::{validate_namespace, KvStore, StoreProvider};
use crate::value::Value;

/// In-memory store implementation.
///
/// All data is lost when the last handle is dropped. Thread-safe via RwLock.
/// There is nothing to flush, so buffered and durable writes behave the same.
pub struct MemoryStore {
    namespace: String,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    fn write_entry(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.entries.write().map_err(StoreError::poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

impl KvStore for MemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self.entries.read().map_err(StoreError::poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        let entries = self.entries.read().map_err(StoreError::poisoned)?;
        Ok(entries.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(StoreError::poisoned)?;
        Ok(entries.keys().cloned().collect())
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        self.write_entry(key, value)
    }

    fn put_durable(&self, key: &str, value: Value) -> Result<()> {
        self.write_entry(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(StoreError::poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().map_err(StoreError::poisoned)?;
        entries.clear();
        Ok(())
    }
}

/// Hands out one [`MemoryStore`] per namespace name.
///
/// Stores live as long as the provider does, so adapters rebuilt on the same
/// provider observe earlier writes.
#[derive(Default)]
pub struct MemoryProvider {
    stores: Mutex<HashMap<String, Arc<MemoryStore>>>,
}

impl MemoryProvider {
    /// Create a provider with no namespaces.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreProvider for MemoryProvider {
    fn open(&self, namespace: &str) -> Result<Arc<dyn KvStore>> {
        validate_namespace(namespace)?;
        let mut stores = self.stores.lock().map_err(StoreError::poisoned)?;
        let store = stores
            .entry(namespace.to_string())
            .or_insert_with(|| Arc::new(MemoryStore::new(namespace)))
            .clone();
        Ok(store as Arc<dyn KvStore>)
    }
}
