//! Cache error types.

use thiserror::Error;

/// Result type for cache store operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors raised by a cache store.
///
/// The request cache never hands these to its caller: a failed read counts
/// as a miss and a failed write is logged and dropped.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The store could not be opened.
    #[error("failed to open cache store: {0}")]
    Open(String),

    /// Filesystem operation failed.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize an entry.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored entry could not be read back.
    #[error("corrupt cache entry {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

impl CacheError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
