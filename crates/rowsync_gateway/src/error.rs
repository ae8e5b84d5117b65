//! Error types for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rowsync_docstore::DocStoreError;
use rowsync_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur in the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A collection name failed the allow-list check.
    #[error(transparent)]
    InvalidCollection(#[from] StoreError),

    /// The remote document store call failed.
    #[error(transparent)]
    DocStore(#[from] DocStoreError),

    /// Bad or incomplete configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error (binding the listener, reading the credential file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status this error maps onto.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidCollection(_) => StatusCode::BAD_REQUEST,
            GatewayError::DocStore(_)
            | GatewayError::Config(_)
            | GatewayError::Io(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
