//! Protocol module for chat completion request/response structures
//!
//! These types mirror the JSON schema of an OpenAI-style chat completion
//! endpoint. Field names follow Rust conventions; where the wire key differs
//! (`top_p`, `n`) the mapping is fixed with `#[serde(rename)]`.

mod conversation;
mod error;
mod response;
mod schema;
pub mod types;

pub use conversation::{ChatConversation, ChatConversationFunction, FunctionCallChoice};
pub use error::{ChatError, ChatErrorDetail};
pub use response::{ChatChoice, ChatCompletion, ChatUsage};
pub use schema::{ParameterSchema, SchemaType, TypedSchema};
pub use types::{ChatFunctionCall, ChatFunctions, ChatMessage, ChatRole, FunctionCall};

// Re-export common traits for convenience
pub use types::{IntoMessage, MessageBuilder};
