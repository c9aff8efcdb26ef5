//! Codec error types

use thiserror::Error;

use crate::protocol::ChatError;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while moving protocol values to and from JSON
#[derive(Debug, Error)]
pub enum CodecError {
    /// Value could not be serialized
    #[error("Failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// Input did not match the expected shape
    #[error("Failed to decode payload at line {line}, column {column}: {message}")]
    Decode {
        line: usize,
        column: usize,
        message: String,
    },

    /// The service answered with an error envelope
    #[error("Service returned an error: {0}")]
    Remote(#[from] ChatError),
}

impl CodecError {
    /// Decoding fault from a serde_json error, keeping its location
    pub(crate) fn decode(err: serde_json::Error) -> Self {
        CodecError::Decode {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }

    /// The remote error envelope, if this error carries one
    pub fn remote(&self) -> Option<&ChatError> {
        match self {
            CodecError::Remote(err) => Some(err),
            _ => None,
        }
    }
}
