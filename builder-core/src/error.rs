//! Error types for editor operations.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for editor operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors that can occur in editor operations.
///
/// Invalid element references, malformed numeric input and missing drag
/// payloads are not errors; they degrade to no-ops or defaults.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// The persistence sink rejected a write or read.
    #[error("Persistence failed: {0}")]
    PersistenceFailed(#[from] StorageError),

    /// Element list serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
