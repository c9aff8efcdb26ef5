//! JSON encoding and decoding of protocol values
//!
//! Thin wrappers over `serde_json` that attach location information to
//! decoding faults and recognise the service's error envelope.

mod error;

pub use error::{CodecError, CodecResult};

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::protocol::{ChatCompletion, ChatError};

/// Serialize a value to compact JSON
pub fn encode<T: Serialize>(value: &T) -> CodecResult<String> {
    let json = serde_json::to_string(value).map_err(CodecError::Encode)?;
    debug!(bytes = json.len(), "encoded payload");
    Ok(json)
}

/// Serialize a value to indented JSON
pub fn encode_pretty<T: Serialize>(value: &T) -> CodecResult<String> {
    let json = serde_json::to_string_pretty(value).map_err(CodecError::Encode)?;
    debug!(bytes = json.len(), "encoded payload");
    Ok(json)
}

/// Deserialize a value from a JSON string
pub fn decode<T: DeserializeOwned>(json: &str) -> CodecResult<T> {
    debug!(bytes = json.len(), "decoding payload");
    serde_json::from_str(json).map_err(|e| {
        warn!("Failed to decode payload: {}", e);
        CodecError::decode(e)
    })
}

/// Deserialize a value from raw JSON bytes
pub fn decode_slice<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    debug!(bytes = bytes.len(), "decoding payload");
    serde_json::from_slice(bytes).map_err(|e| {
        warn!("Failed to decode payload: {}", e);
        CodecError::decode(e)
    })
}

/// Decode a response body that is either a completion or an error envelope
///
/// A top-level, non-null `"error"` member means the service rejected the
/// request; the envelope is returned as [`CodecError::Remote`].
pub fn decode_completion(body: &str) -> CodecResult<ChatCompletion> {
    let marker: ErrorMember = decode(body)?;

    if marker.error.is_some() {
        let envelope: ChatError = decode(body)?;
        warn!(
            error_type = %envelope.error_type(),
            "service returned an error envelope: {}",
            envelope.message()
        );
        return Err(CodecError::Remote(envelope));
    }

    decode(body)
}

/// Top-level `"error"` member, skipped without building a value
#[derive(Deserialize)]
struct ErrorMember {
    #[serde(default)]
    error: Option<IgnoredAny>,
}
