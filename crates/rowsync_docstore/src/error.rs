//! Error types for document store operations.

use thiserror::Error;

/// Result type for document store operations.
pub type DocStoreResult<T> = Result<T, DocStoreError>;

/// Errors that can occur talking to the remote document store.
#[derive(Debug, Error)]
pub enum DocStoreError {
    /// The HTTP request itself failed (connection, TLS, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned status {code}: {message}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// The response body could not be interpreted.
    #[error("could not decode store response: {0}")]
    Decode(String),

    /// The service-account credential blob was unusable.
    #[error("bad credentials: {0}")]
    Credentials(String),
}
