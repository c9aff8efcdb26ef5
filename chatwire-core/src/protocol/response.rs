//! Chat completion response body

use serde::{Deserialize, Serialize};

use super::types::{ChatFunctionCall, ChatMessage};

/// Non-streaming chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Unique response ID
    pub id: String,

    /// Object type, `chat.completion`
    pub object: String,

    /// Creation timestamp (unix seconds)
    pub created: i64,

    /// Model that produced the completion
    pub model: String,

    /// Generated alternatives, one per requested completion
    pub choices: Vec<ChatChoice>,

    /// Token accounting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ChatUsage>,
}

/// One generated alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,

    pub message: ChatMessage,

    /// `stop`, `length`, `function_call` or `content_filter`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatCompletion {
    /// Message of the first choice
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|choice| &choice.message)
    }

    /// Function call requested by the first choice
    pub fn function_call(&self) -> Option<&ChatFunctionCall> {
        self.first_message()
            .and_then(|message| message.function_call.as_ref())
    }
}
