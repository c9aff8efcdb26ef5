//! Request defaults loaded from configuration files

use serde::{Deserialize, Serialize};

use crate::protocol::{
    ChatConversation, ChatConversationFunction, ChatFunctions, ChatMessage, FunctionCallChoice,
    TypedSchema,
};
use crate::validation::{self, Validate, ValidationError};

/// Default request parameters applied to every conversation built from them
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationDefaults {
    /// Model identifier (required)
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Completions per request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    /// End-user identifier attached to every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Function calling mode for function-calling requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallChoice>,

    /// Validate every request built from these defaults
    #[serde(default)]
    pub strict: bool,
}

impl ConversationDefaults {
    /// Create defaults for a model with nothing else set
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Fill every field the caller left unset
    pub fn apply(&self, conversation: &mut ChatConversation) {
        if conversation.model.is_empty() {
            conversation.model = self.model.clone();
        }
        fill(&mut conversation.temperature, self.temperature);
        fill(&mut conversation.top_probability_mass, self.top_p);
        fill(&mut conversation.choices, self.n);
        fill(&mut conversation.max_tokens, self.max_tokens);
        fill(&mut conversation.presence_penalty, self.presence_penalty);
        fill(&mut conversation.frequency_penalty, self.frequency_penalty);
        fill(&mut conversation.stop, self.stop.clone());
        fill(&mut conversation.user, self.user.clone());
    }

    /// Build a conversation from these defaults
    pub fn conversation(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatConversation, ValidationError> {
        let mut conversation = ChatConversation::new(self.model.clone(), messages);
        self.apply(&mut conversation);
        if self.strict {
            conversation.validate()?;
        }
        Ok(conversation)
    }

    /// Build a function-calling conversation from these defaults
    pub fn function_conversation<T: TypedSchema>(
        &self,
        messages: Vec<ChatMessage>,
        functions: Vec<ChatFunctions<T>>,
    ) -> Result<ChatConversationFunction<T>, ValidationError> {
        let mut conversation = ChatConversation::new(self.model.clone(), messages);
        self.apply(&mut conversation);

        let request = ChatConversationFunction::new(conversation)
            .with_functions(functions)
            .with_function_call(self.function_call.clone().unwrap_or_default());
        if self.strict {
            request.validate()?;
        }
        Ok(request)
    }
}

/// Checks the defaults themselves against the API limits
impl Validate for ConversationDefaults {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.model.is_empty() {
            return Err(ValidationError::required("model"));
        }

        if let Some(FunctionCallChoice::Mode(mode)) = &self.function_call {
            if mode != FunctionCallChoice::AUTO && mode != FunctionCallChoice::NONE {
                return Err(ValidationError::invalid_format(
                    "function_call",
                    format!("expected \"auto\" or \"none\", got \"{}\"", mode),
                ));
            }
        }

        let mut sample = ChatConversation::default();
        self.apply(&mut sample);
        validation::check_parameters(&sample)
    }
}

fn fill<T>(slot: &mut Option<T>, default: Option<T>) {
    if slot.is_none() {
        *slot = default;
    }
}
