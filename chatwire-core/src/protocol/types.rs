//! Message-level protocol types
//!
//! Roles, messages and the function-calling records that travel inside a
//! chat conversation. Every optional field is omitted from the wire when unset.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::schema::{ParameterSchema, TypedSchema};

/// Role of the author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions that steer the assistant
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
    /// Result of a client-side function invocation
    Function,
}

impl ChatRole {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Function => "function",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a conversation
///
/// `content` may only be absent on an assistant message that carries a
/// `function_call`, and `name` is expected on function messages. Neither rule
/// is checked when decoding; see [`crate::validation::Validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message
    pub role: ChatRole,

    /// Text of the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Author name, up to 64 characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Function the assistant wants the client to invoke
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<ChatFunctionCall>,
}

/// A function invocation requested by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFunctionCall {
    /// Name of the function to call
    pub name: String,

    /// Arguments as a serialized JSON object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl ChatFunctionCall {
    /// Create a call with serialized arguments
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Some(arguments.into()),
        }
    }

    /// Create a call without arguments
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
        }
    }

    /// Decode the argument string into a caller-defined type.
    ///
    /// Missing arguments decode as an empty JSON object.
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.arguments.as_deref().unwrap_or("{}"))
    }
}

/// Reference to a function by name, used to force a specific call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A function the model may call, with its parameter schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatFunctions<T: TypedSchema = ParameterSchema> {
    /// Function name
    pub name: String,

    /// What the function does, shown to the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Schema of the arguments object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<T>,
}

impl<T: TypedSchema> ChatFunctions<T> {
    /// Create a function definition with no description or parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the parameter schema
    pub fn with_parameters(mut self, parameters: T) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

// ============================================================================
// Builder and convenience constructors
// ============================================================================

/// Trait for converting types into messages
pub trait IntoMessage {
    /// Convert self into a ChatMessage
    fn into_message(self) -> ChatMessage;
}

impl IntoMessage for ChatMessage {
    fn into_message(self) -> ChatMessage {
        self
    }
}

impl IntoMessage for String {
    fn into_message(self) -> ChatMessage {
        ChatMessage::user(self)
    }
}

impl IntoMessage for &str {
    fn into_message(self) -> ChatMessage {
        ChatMessage::user(self)
    }
}

/// Builder for constructing messages
pub struct MessageBuilder {
    role: ChatRole,
    content: Option<String>,
    name: Option<String>,
    function_call: Option<ChatFunctionCall>,
}

impl MessageBuilder {
    /// Start a message with the given role and no content
    pub fn new(role: ChatRole) -> Self {
        Self {
            role,
            content: None,
            name: None,
            function_call: None,
        }
    }

    /// Set the content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the author name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a function call
    pub fn with_function_call(
        mut self,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        self.function_call = Some(ChatFunctionCall::new(name, arguments));
        self
    }

    /// Build the message
    pub fn build(self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: self.content,
            name: self.name,
            function_call: self.function_call,
        }
    }
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        MessageBuilder::new(ChatRole::System)
            .with_content(content)
            .build()
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        MessageBuilder::new(ChatRole::User).with_content(content).build()
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        MessageBuilder::new(ChatRole::Assistant)
            .with_content(content)
            .build()
    }

    /// Create a message reporting the result of a function invocation
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        MessageBuilder::new(ChatRole::Function)
            .with_name(name)
            .with_content(content)
            .build()
    }

    /// Create an assistant message that only requests a function call
    pub fn function_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        MessageBuilder::new(ChatRole::Assistant)
            .with_function_call(name, arguments)
            .build()
    }

    /// Text content, if any
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}
