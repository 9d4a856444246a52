//! Configuration for SQLite-backed stores.

use std::time::Duration;

/// Configuration for [`SqliteStore`](crate::SqliteStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long a writer waits on a locked database before giving up.
    pub busy_timeout: Duration,
    /// Use write-ahead logging. Buffered writes rely on WAL to skip the
    /// fsync safely; with this off, both write paths sync on commit.
    pub wal: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            wal: true,
        }
    }
}
