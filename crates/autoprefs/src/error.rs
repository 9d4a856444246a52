//! Error types for preference bindings.

use autoprefs_store::StoreError;
use thiserror::Error;

/// Errors that can occur reading or writing a preference.
///
/// A key that was never written is not an error; bindings return their
/// default for it.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Storage error, including reading a key that holds another kind.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The key holds a string that does not decode as the bound type.
    #[error("cannot decode {key:?}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The value could not be encoded as JSON.
    #[error("cannot encode {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A background durable write panicked or was cancelled.
    #[error("durable write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for preference operations.
pub type Result<T> = std::result::Result<T, PrefsError>;
