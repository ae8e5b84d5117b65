//! Error types for wire encoding and decoding.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding wire frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not valid JSON or did not match the expected shape.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The frame carried an event name this protocol does not define.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// The frame was valid JSON but missing a required part.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
