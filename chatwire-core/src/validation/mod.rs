//! Opt-in request validation
//!
//! Decoding accepts anything that matches the JSON shape. The documented
//! contract of the remote API is stricter (name rules, numeric ranges, stop
//! sequence limits); callers that want to catch violations before sending a
//! request run [`Validate::validate`] on it.

mod error;

pub use error::{ValidationError, ValidationErrorKind};

use std::collections::HashSet;
use tracing::debug;

use crate::protocol::{
    ChatConversation, ChatConversationFunction, ChatFunctionCall, ChatFunctions, ChatMessage,
    ChatRole, FunctionCallChoice, TypedSchema,
};

/// Documented limits of the chat completion API
pub mod constants {
    /// Temperature range: 0.0 to 2.0
    pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 2.0);

    /// Top-p range: 0.0 to 1.0
    pub const TOP_P_RANGE: (f32, f32) = (0.0, 1.0);

    /// Presence and frequency penalty range: -2.0 to 2.0
    pub const PENALTY_RANGE: (f32, f32) = (-2.0, 2.0);

    /// Logit bias range: -100 to 100
    pub const LOGIT_BIAS_RANGE: (i32, i32) = (-100, 100);

    /// Maximum number of stop sequences allowed
    pub const MAX_STOP_SEQUENCES: usize = 4;

    /// Maximum length of message author and function names
    pub const MAX_NAME_LENGTH: usize = 64;
}

use constants::*;

/// Types that can check themselves against the documented API contract
pub trait Validate {
    /// Return the first violation found, if any
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for ChatMessage {
    fn validate(&self) -> Result<(), ValidationError> {
        logged(check_message(self))
    }
}

impl Validate for ChatFunctionCall {
    fn validate(&self) -> Result<(), ValidationError> {
        logged(check_name("name", &self.name))
    }
}

impl<T: TypedSchema> Validate for ChatFunctions<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        logged(check_function(self))
    }
}

impl Validate for ChatConversation {
    fn validate(&self) -> Result<(), ValidationError> {
        logged(check_conversation(self))
    }
}

impl<T: TypedSchema> Validate for ChatConversationFunction<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        logged(check_function_conversation(self))
    }
}

fn logged(result: Result<(), ValidationError>) -> Result<(), ValidationError> {
    if let Err(err) = &result {
        debug!(field = %err.field_path, "validation failed: {}", err.kind);
    }
    result
}

fn check_message(message: &ChatMessage) -> Result<(), ValidationError> {
    match &message.name {
        Some(name) => check_name("name", name)?,
        None if message.role == ChatRole::Function => {
            return Err(ValidationError::required("name")
                .with_context("function messages must name the function"));
        }
        None => {}
    }

    let carries_call = message.role == ChatRole::Assistant && message.function_call.is_some();
    if message.content.is_none() && !carries_call {
        return Err(ValidationError::required("content")
            .with_context("only assistant messages with a function_call may omit content"));
    }

    if let Some(call) = &message.function_call {
        check_name("name", &call.name).map_err(|e| e.nested("function_call"))?;
    }

    Ok(())
}

fn check_function<T: TypedSchema>(function: &ChatFunctions<T>) -> Result<(), ValidationError> {
    check_name("name", &function.name)?;

    if let Some(parameters) = &function.parameters {
        if parameters.type_tag().is_empty() {
            return Err(ValidationError::required("parameters.type"));
        }
    }

    Ok(())
}

fn check_conversation(conversation: &ChatConversation) -> Result<(), ValidationError> {
    if conversation.model.is_empty() {
        return Err(ValidationError::required("model"));
    }

    if conversation.messages.is_empty() {
        return Err(ValidationError::required("messages")
            .with_context("a conversation needs at least one message"));
    }

    for (i, message) in conversation.messages.iter().enumerate() {
        check_message(message).map_err(|e| e.nested(&format!("messages[{}]", i)))?;
    }

    check_parameters(conversation)
}

/// Sampling parameters and limits, everything except model and messages
pub(crate) fn check_parameters(conversation: &ChatConversation) -> Result<(), ValidationError> {
    check_range("temperature", conversation.temperature, TEMPERATURE_RANGE)?;
    check_range("top_p", conversation.top_probability_mass, TOP_P_RANGE)?;
    check_range("presence_penalty", conversation.presence_penalty, PENALTY_RANGE)?;
    check_range("frequency_penalty", conversation.frequency_penalty, PENALTY_RANGE)?;

    if let Some(n) = conversation.choices {
        if n == 0 {
            return Err(ValidationError::out_of_range("n", n, 1, u32::MAX));
        }
    }

    if let Some(max_tokens) = conversation.max_tokens {
        if max_tokens == 0 {
            return Err(ValidationError::out_of_range(
                "max_tokens",
                max_tokens,
                1,
                u32::MAX,
            ));
        }
    }

    if let Some(stop) = &conversation.stop {
        if stop.len() > MAX_STOP_SEQUENCES {
            return Err(ValidationError::new(
                "stop",
                ValidationErrorKind::TooManyItems {
                    count: stop.len(),
                    max: MAX_STOP_SEQUENCES,
                },
            ));
        }
    }

    if let Some(logit_bias) = &conversation.logit_bias {
        let (min, max) = LOGIT_BIAS_RANGE;
        for (token, bias) in logit_bias {
            let path = format!("logit_bias.{}", token);
            if token.parse::<u32>().is_err() {
                return Err(ValidationError::invalid_format(
                    path,
                    "token id must be a non-negative integer",
                ));
            }
            if !(min..=max).contains(bias) {
                return Err(ValidationError::out_of_range(path, bias, min, max));
            }
        }
    }

    Ok(())
}

fn check_function_conversation<T: TypedSchema>(
    request: &ChatConversationFunction<T>,
) -> Result<(), ValidationError> {
    check_conversation(&request.conversation)?;

    let mut seen = HashSet::new();
    for (i, function) in request.functions.iter().flatten().enumerate() {
        let parent = format!("functions[{}]", i);
        check_function(function).map_err(|e| e.nested(&parent))?;
        if !seen.insert(function.name.as_str()) {
            return Err(ValidationError::new(
                format!("{}.name", parent),
                ValidationErrorKind::DuplicateValue {
                    value: function.name.clone(),
                },
            ));
        }
    }

    match &request.function_call {
        FunctionCallChoice::Mode(mode)
            if mode == FunctionCallChoice::AUTO || mode == FunctionCallChoice::NONE => {}
        FunctionCallChoice::Mode(mode) => {
            return Err(ValidationError::invalid_format(
                "function_call",
                format!("expected \"auto\" or \"none\", got \"{}\"", mode),
            ));
        }
        FunctionCallChoice::Function(call) => {
            if request.function(&call.name).is_none() {
                return Err(ValidationError::new(
                    "function_call.name",
                    ValidationErrorKind::UnknownReference {
                        name: call.name.clone(),
                    },
                )
                .with_context("forced function must be declared in functions"));
            }
        }
    }

    Ok(())
}

/// Names may hold letters, digits, underscores and dashes, up to 64 characters
fn check_name(path: &str, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::required(path));
    }

    let length = name.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(ValidationError::new(
            path,
            ValidationErrorKind::TooLong {
                length,
                max: MAX_NAME_LENGTH,
            },
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ValidationError::invalid_format(
            path,
            "only letters, digits, '_' and '-' are allowed",
        ));
    }

    Ok(())
}

/// NaN is rejected along with out-of-range values
fn check_range(path: &str, value: Option<f32>, range: (f32, f32)) -> Result<(), ValidationError> {
    let (min, max) = range;
    match value {
        Some(v) if !(min..=max).contains(&v) => {
            Err(ValidationError::out_of_range(path, v, min, max))
        }
        _ => Ok(()),
    }
}
