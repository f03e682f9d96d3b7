//! Error types for the wire protocol.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while decoding a response body.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The body was not valid JSON for the expected shape.
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// A create call answered with something other than a term id.
    #[error("malformed term id in response body: {0:?}")]
    MalformedId(String),
}
