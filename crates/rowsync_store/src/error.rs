//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the ephemeral store.
///
/// Note what is *not* here: merging or removing an id with no matching
/// record is a silent no-op, not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The collection name is not in the allow-list.
    #[error("invalid collection: {0}")]
    InvalidCollection(String),
}
