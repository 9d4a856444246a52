//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::Path;

use autoprefs::store::{MemoryProvider, SqliteProvider};
use autoprefs::AutoPrefs;
use tempfile::TempDir;

/// A test fixture with an in-memory provider and one open namespace.
pub struct TestFixture {
    pub provider: MemoryProvider,
    pub prefs: AutoPrefs,
}

impl TestFixture {
    /// Create a fixture on the `"test"` namespace.
    pub fn new() -> Self {
        Self::with_namespace("test")
    }

    /// Create a fixture on a specific namespace.
    pub fn with_namespace(namespace: &str) -> Self {
        let provider = MemoryProvider::new();
        let prefs = AutoPrefs::create(&provider, namespace).expect("open fixture namespace");
        Self { provider, prefs }
    }

    /// A second adapter on the same namespace, as if rebuilt by the app.
    pub fn reopen(&self) -> AutoPrefs {
        AutoPrefs::create(&self.provider, self.prefs.namespace()).expect("reopen namespace")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A SQLite provider rooted in a temporary directory.
///
/// The directory is deleted when the fixture is dropped.
pub struct SqliteFixture {
    dir: TempDir,
    pub provider: SqliteProvider,
}

impl SqliteFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let provider = Self::provider_at(dir.path());
        Self { dir, provider }
    }

    /// The directory holding the namespace databases.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A brand-new provider over the same files, with its own connections.
    pub fn fresh_provider(&self) -> SqliteProvider {
        Self::provider_at(self.dir.path())
    }

    fn provider_at(path: &Path) -> SqliteProvider {
        SqliteProvider::new(path).expect("open sqlite provider")
    }
}

impl Default for SqliteFixture {
    fn default() -> Self {
        Self::new()
    }
}
