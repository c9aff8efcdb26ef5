//! Chatwire Core Library
//!
//! Typed request and response records for an OpenAI-style chat completion
//! API, with the wire field mapping fixed by serde attributes.
//!
//! ```
//! use chatwire_core::protocol::{ChatConversation, ChatMessage};
//!
//! let request = ChatConversation::new("gpt-3.5-turbo", vec![ChatMessage::user("Hello!")])
//!     .with_top_probability_mass(0.9);
//! let json = chatwire_core::codec::encode(&request).unwrap();
//! assert!(json.contains("\"top_p\":0.9"));
//! ```

pub mod codec;
pub mod config;
pub mod protocol;
pub mod validation;

pub use codec::{CodecError, CodecResult};
pub use validation::{Validate, ValidationError};

/// Returns the version of the Chatwire Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
