//! Chat completion request payloads
//!
//! [`ChatConversation`] is the plain request body. [`ChatConversationFunction`]
//! carries the same fields, flattened onto the same JSON object, plus the
//! function-calling extension.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::schema::{ParameterSchema, TypedSchema};
use super::types::{ChatFunctions, ChatMessage, FunctionCall, IntoMessage};

/// Chat completion request
///
/// Only `model` and `messages` are required; every other field falls back to
/// the service default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChatConversation {
    /// End-user identifier for abuse monitoring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Messages in chronological order
    pub messages: Vec<ChatMessage>,

    /// Model identifier
    pub model: String,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling probability mass (0.0 to 1.0)
    #[serde(rename = "top_p", skip_serializing_if = "Option::is_none")]
    pub top_probability_mass: Option<f32>,

    /// Number of completions to generate
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub choices: Option<u32>,

    /// Up to 4 sequences that end generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Presence penalty (-2.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,

    /// Frequency penalty (-2.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,

    /// Token id (as a decimal string) to bias (-100 to 100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<BTreeMap<String, i32>>,
}

impl ChatConversation {
    /// Create a request for `model` with the given history
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }

    /// Append a message to the history
    pub fn with_message(mut self, message: impl IntoMessage) -> Self {
        self.messages.push(message.into_message());
        self
    }

    /// Set the end-user identifier
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set nucleus sampling probability mass
    pub fn with_top_probability_mass(mut self, top_p: f32) -> Self {
        self.top_probability_mass = Some(top_p);
        self
    }

    /// Set the number of completions
    pub fn with_choices(mut self, choices: u32) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Set stop sequences
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Add a single stop sequence
    pub fn with_stop_sequence(mut self, stop: impl Into<String>) -> Self {
        self.stop.get_or_insert_with(Vec::new).push(stop.into());
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set presence penalty
    pub fn with_presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Set frequency penalty
    pub fn with_frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// Bias a single token
    pub fn with_logit_bias(mut self, token_id: u32, bias: i32) -> Self {
        self.logit_bias
            .get_or_insert_with(BTreeMap::new)
            .insert(token_id.to_string(), bias);
        self
    }

    /// Attach function definitions, turning this into a function-calling request
    pub fn with_functions<T: TypedSchema>(
        self,
        functions: Vec<ChatFunctions<T>>,
    ) -> ChatConversationFunction<T> {
        ChatConversationFunction::new(self).with_functions(functions)
    }
}

/// How the model should use the supplied functions
///
/// Either a mode string (`"auto"` or `"none"`) or an object naming the
/// function the model must call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionCallChoice {
    /// `"auto"`, `"none"`
    Mode(String),
    /// Force a call to this function
    Function(FunctionCall),
}

impl FunctionCallChoice {
    pub const AUTO: &'static str = "auto";
    pub const NONE: &'static str = "none";

    /// Let the model decide
    pub fn auto() -> Self {
        FunctionCallChoice::Mode(Self::AUTO.to_string())
    }

    /// Never call a function
    pub fn none() -> Self {
        FunctionCallChoice::Mode(Self::NONE.to_string())
    }

    /// Always call `name`
    pub fn function(name: impl Into<String>) -> Self {
        FunctionCallChoice::Function(FunctionCall::new(name))
    }

    /// Mode string, if this is not a forced call
    pub fn as_mode(&self) -> Option<&str> {
        match self {
            FunctionCallChoice::Mode(mode) => Some(mode.as_str()),
            FunctionCallChoice::Function(_) => None,
        }
    }
}

impl Default for FunctionCallChoice {
    fn default() -> Self {
        Self::auto()
    }
}

/// Chat completion request with function calling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConversationFunction<T: TypedSchema = ParameterSchema> {
    /// Base request fields, flattened into the same JSON object
    #[serde(flatten)]
    pub conversation: ChatConversation,

    /// Functions the model may call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<ChatFunctions<T>>>,

    /// Function calling mode, `"auto"` when absent or null
    #[serde(default, deserialize_with = "null_as_default")]
    pub function_call: FunctionCallChoice,
}

fn null_as_default<'de, D>(deserializer: D) -> Result<FunctionCallChoice, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FunctionCallChoice>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T: TypedSchema> ChatConversationFunction<T> {
    /// Wrap a conversation with no functions and the `"auto"` mode
    pub fn new(conversation: ChatConversation) -> Self {
        Self {
            conversation,
            functions: None,
            function_call: FunctionCallChoice::default(),
        }
    }

    /// Add one function definition
    pub fn with_function(mut self, function: ChatFunctions<T>) -> Self {
        self.functions.get_or_insert_with(Vec::new).push(function);
        self
    }

    /// Replace the function definitions
    pub fn with_functions(mut self, functions: Vec<ChatFunctions<T>>) -> Self {
        self.functions = Some(functions);
        self
    }

    /// Set the function calling mode
    pub fn with_function_call(mut self, choice: FunctionCallChoice) -> Self {
        self.function_call = choice;
        self
    }

    /// Look up a declared function by name
    pub fn function(&self, name: &str) -> Option<&ChatFunctions<T>> {
        self.functions
            .as_deref()
            .and_then(|functions| functions.iter().find(|f| f.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_fields_are_omitted() {
        let conversation = ChatConversation::new("gpt-4", vec![ChatMessage::user("hi")]);
        let value = serde_json::to_value(&conversation).unwrap();
        assert_eq!(
            value,
            json!({
                "messages": [{"role": "user", "content": "hi"}],
                "model": "gpt-4"
            })
        );
    }

    #[test]
    fn logit_bias_keys_are_token_ids() {
        let conversation = ChatConversation::new("gpt-4", vec![])
            .with_logit_bias(50256, -100)
            .with_logit_bias(198, 5);
        let value = serde_json::to_value(&conversation).unwrap();
        assert_eq!(value["logit_bias"], json!({"198": 5, "50256": -100}));
    }

    #[test]
    fn function_call_choice_shapes() {
        assert_eq!(
            serde_json::to_value(FunctionCallChoice::none()).unwrap(),
            json!("none")
        );
        assert_eq!(
            serde_json::to_value(FunctionCallChoice::function("get_weather")).unwrap(),
            json!({"name": "get_weather"})
        );
        let decoded: FunctionCallChoice = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(decoded, FunctionCallChoice::function("x"));
        assert_eq!(decoded.as_mode(), None);
    }

    #[test]
    fn function_conversation_flattens_base_fields() {
        let request: ChatConversationFunction =
            ChatConversation::new("gpt-4", vec![ChatMessage::user("weather?")])
                .with_temperature(0.5)
                .with_functions(vec![ChatFunctions::new("get_weather")]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], json!("gpt-4"));
        assert_eq!(value["temperature"], json!(0.5));
        assert_eq!(value["functions"], json!([{"name": "get_weather"}]));
        assert_eq!(value["function_call"], json!("auto"));
        assert!(value.get("conversation").is_none());
    }

    #[test]
    fn missing_function_call_decodes_as_auto() {
        let request: ChatConversationFunction = serde_json::from_value(json!({
            "model": "gpt-4",
            "messages": []
        }))
        .unwrap();
        assert_eq!(request.function_call, FunctionCallChoice::auto());
        assert!(request.functions.is_none());
    }

    #[test]
    fn null_function_call_decodes_as_auto() {
        let request: ChatConversationFunction = serde_json::from_value(json!({
            "model": "gpt-4",
            "messages": [],
            "function_call": null
        }))
        .unwrap();
        assert_eq!(request.function_call, FunctionCallChoice::auto());

        let forced: ChatConversationFunction = serde_json::from_str(
            r#"{"model":"gpt-4","messages":[],"function_call":{"name":"get_weather"}}"#,
        )
        .unwrap();
        assert_eq!(forced.function_call, FunctionCallChoice::function("get_weather"));
    }

    #[test]
    fn function_lookup() {
        let request = ChatConversationFunction::<ParameterSchema>::new(ChatConversation::new(
            "gpt-4",
            vec![],
        ))
        .with_function(ChatFunctions::new("a"))
        .with_function(ChatFunctions::new("b"));
        assert!(request.function("b").is_some());
        assert!(request.function("c").is_none());
    }
}
