//! The adapter: builds typed bindings over one namespace.

use std::sync::Arc;

use autoprefs_store::{KvStore, StoreProvider};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::pref::{BoolPref, DurablePref, DurableStringPref, IntPref, JsonPref, Pref, StringPref};

/// Namespace used by [`AutoPrefs::create_default`].
pub const DEFAULT_NAMESPACE: &str = "AutoPrefs";

/// Typed access to one preference namespace.
///
/// `AutoPrefs` is a thin factory. It holds the namespace's store handle and
/// nothing else; each binding it hands out is fixed to one key, default and
/// type for its whole life.
///
/// ```rust
/// use autoprefs::AutoPrefs;
/// use autoprefs::store::MemoryProvider;
///
/// # fn main() -> autoprefs::Result<()> {
/// let provider = MemoryProvider::new();
/// let prefs = AutoPrefs::create(&provider, "user_settings")?;
///
/// let username = prefs.string("username", "Guest");
/// assert_eq!(username.get()?, "Guest");
///
/// username.set("JohnDoe")?;
///
/// // A new adapter on the same namespace sees the write.
/// let again = AutoPrefs::create(&provider, "user_settings")?;
/// assert_eq!(again.string("username", "Guest").get()?, "JohnDoe");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AutoPrefs {
    store: Arc<dyn KvStore>,
}

impl AutoPrefs {
    /// Wrap an existing store handle.
    pub fn from_store(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Open `namespace` through `provider`.
    ///
    /// Providers hand out one handle per name, so every adapter created for
    /// the same namespace shares its store.
    pub fn create<P>(provider: &P, namespace: &str) -> Result<Self>
    where
        P: StoreProvider + ?Sized,
    {
        Ok(Self::from_store(provider.open(namespace)?))
    }

    /// Open the [`DEFAULT_NAMESPACE`].
    pub fn create_default<P>(provider: &P) -> Result<Self>
    where
        P: StoreProvider + ?Sized,
    {
        Self::create(provider, DEFAULT_NAMESPACE)
    }

    /// The namespace this adapter reads and writes.
    pub fn namespace(&self) -> &str {
        self.store.namespace()
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bindings
    // ─────────────────────────────────────────────────────────────────────────

    /// Bind a string. Reads return `default` while `key` is unset.
    pub fn string(&self, key: impl Into<String>, default: impl Into<String>) -> StringPref {
        Pref::new(self.store.clone(), key.into(), default.into())
    }

    /// Bind an `i32`.
    pub fn int(&self, key: impl Into<String>, default: i32) -> IntPref {
        Pref::new(self.store.clone(), key.into(), default)
    }

    /// Bind a `bool`.
    pub fn boolean(&self, key: impl Into<String>, default: bool) -> BoolPref {
        Pref::new(self.store.clone(), key.into(), default)
    }

    /// Bind any serde type, stored as a JSON string.
    ///
    /// A stored string that is not valid JSON for `T` makes
    /// [`get`](Pref::get) fail with [`PrefsError::Decode`](crate::PrefsError::Decode)
    /// rather than return `default`.
    pub fn json<T>(&self, key: impl Into<String>, default: T) -> JsonPref<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        Pref::new(self.store.clone(), key.into(), default)
    }

    /// Bind a string whose writes block until the store has committed them.
    pub fn durable_string(
        &self,
        key: impl Into<String>,
        default: impl Into<String>,
    ) -> DurableStringPref {
        DurablePref::new(self.store.clone(), key.into(), default.into())
    }
}
