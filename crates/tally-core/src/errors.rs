//! Error types for the storage contract.
//!
//! [`StorageError`] is what adapters return; the logger facade swallows it
//! after a console report, while direct adapter consumers (the viewer
//! surfaces) inspect it.

use thiserror::Error;

/// Errors that can occur during storage adapter operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying medium is unreachable or rejected the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A write collided with an existing entry id. Writes are inserts,
    /// never upserts; a collision must not silently overwrite.
    #[error("duplicate entry id: {0}")]
    DuplicateId(String),

    /// A value survived sanitization but still could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for adapter results.
pub type Result<T> = std::result::Result<T, StorageError>;
