//! SQLite implementation of the store traits.
//!
//! This is the primary storage backend for AutoPrefs. It uses rusqlite with
//! bundled SQLite, one database file per namespace.
//!
//! The two write paths differ only in how hard SQLite syncs the commit. The
//! connection runs in WAL mode with `synchronous = NORMAL`, so a buffered
//! write is committed to the WAL and visible to every reader but the fsync is
//! left to the next checkpoint. A durable write flips the connection to
//! `synchronous = FULL` for its single statement, which makes SQLite fsync the
//! WAL before the commit returns.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{validate_namespace, KvStore, StoreProvider};
use crate::value::{Value, ValueKind};

/// How hard SQLite syncs a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncLevel {
    Normal,
    Full,
}

impl SyncLevel {
    fn pragma(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Full => "FULL",
        }
    }
}

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. Calls block the current thread for the
/// duration of the SQLite operation.
pub struct SqliteStore {
    namespace: String,
    /// The SQLite connection, protected by a mutex.
    conn: Mutex<Connection>,
    /// Sync level used by buffered writes.
    buffered: SyncLevel,
}

impl SqliteStore {
    /// Open a SQLite database at the given path with default configuration.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(namespace: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(namespace, path, &StoreConfig::default())
    }

    /// Open a SQLite database at the given path.
    pub fn open_with(
        namespace: impl Into<String>,
        path: impl AsRef<Path>,
        config: &StoreConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let store = Self::init(namespace.into(), conn, config)?;
        tracing::debug!(namespace = %store.namespace, path = %path.display(), "opened preference store");
        Ok(store)
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory(namespace: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(namespace.into(), conn, &StoreConfig::default())
    }

    fn init(namespace: String, mut conn: Connection, config: &StoreConfig) -> Result<Self> {
        conn.busy_timeout(config.busy_timeout)?;

        let buffered = if config.wal {
            // In-memory databases report "memory" here and that's fine.
            let mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get(0)
            })?;
            tracing::trace!(%namespace, journal_mode = %mode, "configured journal");
            SyncLevel::Normal
        } else {
            SyncLevel::Full
        };
        conn.pragma_update(None, "synchronous", buffered.pragma())?;

        migration::migrate(&mut conn)?;

        Ok(Self {
            namespace,
            conn: Mutex::new(conn),
            buffered,
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(StoreError::poisoned)?;
        f(&conn)
    }

    fn write(&self, key: &str, value: &Value, sync: SyncLevel) -> Result<()> {
        self.with_conn(|conn| {
            if sync == self.buffered {
                return upsert(conn, key, value);
            }

            conn.pragma_update(None, "synchronous", sync.pragma())?;
            let result = upsert(conn, key, value);
            // Restore even when the write failed, the connection is reused.
            // The write's own result is what the caller gets either way.
            if let Err(e) = conn.pragma_update(None, "synchronous", self.buffered.pragma()) {
                tracing::warn!(namespace = %self.namespace, error = %e, "failed to restore sync level");
            }
            result
        })
    }
}

fn upsert(conn: &Connection, key: &str, value: &Value) -> Result<()> {
    conn.execute(
        "INSERT INTO entries (key, kind, value, updated_at) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(key) DO UPDATE SET
            kind = excluded.kind,
            value = excluded.value,
            updated_at = excluded.updated_at",
        params![key, value.kind().as_u8(), to_sql(value), now_millis()],
    )?;
    Ok(())
}

// Helper to convert a Value to its column representation
fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Int(v) => SqlValue::Integer(i64::from(*v)),
        Value::Bool(v) => SqlValue::Integer(i64::from(*v)),
    }
}

// Helper to convert a (kind, value) row back to a Value.
// Text is checked here rather than by rusqlite, which panics on bad UTF-8.
fn from_sql(key: &str, kind: u8, raw: ValueRef<'_>) -> Result<Value> {
    let kind = ValueKind::from_u8(kind)
        .ok_or_else(|| StoreError::InvalidData(format!("key {key:?}: unknown kind {kind}")))?;

    match (kind, raw) {
        (ValueKind::String, ValueRef::Text(bytes)) => std::str::from_utf8(bytes)
            .map(|s| Value::String(s.to_owned()))
            .map_err(|e| StoreError::InvalidData(format!("key {key:?}: {e}"))),
        (ValueKind::Int, ValueRef::Integer(v)) => i32::try_from(v).map(Value::Int).map_err(|_| {
            StoreError::InvalidData(format!("key {key:?}: integer {v} out of range"))
        }),
        (ValueKind::Bool, ValueRef::Integer(0)) => Ok(Value::Bool(false)),
        (ValueKind::Bool, ValueRef::Integer(1)) => Ok(Value::Bool(true)),
        (kind, raw) => Err(StoreError::InvalidData(format!(
            "key {key:?}: {kind} entry holds {:?}",
            raw.data_type()
        ))),
    }
}

impl KvStore for SqliteStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let decoded: Option<Result<Value>> = self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT kind, value FROM entries WHERE key = ?1",
                    params![key],
                    |row| Ok(from_sql(key, row.get(0)?, row.get_ref(1)?)),
                )
                .optional()?)
        })?;

        decoded.transpose()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM entries WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM entries ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(keys)
        })
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        tracing::trace!(namespace = %self.namespace, key, kind = %value.kind(), "buffered write");
        self.write(key, &value, self.buffered)
    }

    fn put_durable(&self, key: &str, value: Value) -> Result<()> {
        tracing::trace!(namespace = %self.namespace, key, kind = %value.kind(), "durable write");
        self.write(key, &value, SyncLevel::Full).map_err(|e| {
            tracing::warn!(namespace = %self.namespace, key, error = %e, "durable write failed");
            e
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM entries WHERE key = ?1", params![key])?;
            Ok(())
        })
    }

    fn clear(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM entries", [])?;
            Ok(())
        })
    }
}

/// Hands out one [`SqliteStore`] per namespace, stored as `<dir>/<name>.db`.
pub struct SqliteProvider {
    dir: PathBuf,
    config: StoreConfig,
    stores: Mutex<HashMap<String, Arc<SqliteStore>>>,
}

impl SqliteProvider {
    /// Create a provider rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(dir, StoreConfig::default())
    }

    /// Create a provider with a custom store configuration.
    pub fn with_config(dir: impl Into<PathBuf>, config: StoreConfig) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            config,
            stores: Mutex::new(HashMap::new()),
        })
    }

    /// Create a provider under the user's config directory
    /// (e.g. `~/.config/<app>/prefs` on Linux).
    pub fn in_config_dir(app: &str) -> Result<Self> {
        validate_namespace(app)?;
        let base = dirs::config_dir()
            .ok_or_else(|| StoreError::Unavailable("could not resolve config dir".into()))?;
        Self::new(base.join(app).join("prefs"))
    }

    /// The directory holding the namespace databases.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The database file backing `namespace`.
    pub fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.db"))
    }
}

impl StoreProvider for SqliteProvider {
    fn open(&self, namespace: &str) -> Result<Arc<dyn KvStore>> {
        validate_namespace(namespace)?;
        let mut stores = self.stores.lock().map_err(StoreError::poisoned)?;

        if let Some(store) = stores.get(namespace) {
            return Ok(store.clone() as Arc<dyn KvStore>);
        }

        let store = Arc::new(SqliteStore::open_with(
            namespace,
            self.path_for(namespace),
            &self.config,
        )?);
        stores.insert(namespace.to_string(), store.clone());
        Ok(store as Arc<dyn KvStore>)
    }
}
