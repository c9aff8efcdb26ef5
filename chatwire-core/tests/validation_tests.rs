//! Tests for opt-in request validation

use chatwire_core::protocol::*;
use chatwire_core::validation::{Validate, ValidationErrorKind};
use test_case::test_case;

fn valid_conversation() -> ChatConversation {
    ChatConversation::new(
        "gpt-3.5-turbo",
        vec![
            ChatMessage::system("You are a weather bot"),
            ChatMessage::user("Weather in Oslo?"),
            ChatMessage::function_call("get_weather", r#"{"city":"Oslo"}"#),
            ChatMessage::function("get_weather", r#"{"temp":4}"#),
        ],
    )
}

#[test]
fn test_valid_conversation_passes() {
    let conversation = valid_conversation()
        .with_temperature(2.0)
        .with_top_probability_mass(0.0)
        .with_presence_penalty(-2.0)
        .with_frequency_penalty(2.0)
        .with_choices(1)
        .with_max_tokens(1)
        .with_stop(vec!["a".into(), "b".into(), "c".into(), "d".into()])
        .with_logit_bias(50256, -100)
        .with_logit_bias(1, 100);
    assert!(conversation.validate().is_ok());
}

#[test_case(valid_conversation().with_temperature(2.1), "temperature" ; "temperature above range")]
#[test_case(valid_conversation().with_temperature(-0.1), "temperature" ; "temperature below range")]
#[test_case(valid_conversation().with_top_probability_mass(1.01), "top_p" ; "top p above range")]
#[test_case(valid_conversation().with_presence_penalty(-2.5), "presence_penalty" ; "presence penalty")]
#[test_case(valid_conversation().with_frequency_penalty(3.0), "frequency_penalty" ; "frequency penalty")]
#[test_case(valid_conversation().with_logit_bias(7, 101), "logit_bias.7" ; "logit bias value")]
#[test_case(valid_conversation().with_choices(0), "n" ; "zero choices")]
#[test_case(valid_conversation().with_max_tokens(0), "max_tokens" ; "zero max tokens")]
fn test_out_of_range(conversation: ChatConversation, field: &str) {
    let err = conversation.validate().unwrap_err();
    assert_eq!(err.field_path, field);
    assert!(matches!(err.kind, ValidationErrorKind::OutOfRange { .. }));
}

#[test]
fn test_too_many_stop_sequences() {
    let conversation = valid_conversation()
        .with_stop_sequence("1")
        .with_stop_sequence("2")
        .with_stop_sequence("3")
        .with_stop_sequence("4")
        .with_stop_sequence("5");
    let err = conversation.validate().unwrap_err();
    assert_eq!(err.field_path, "stop");
    assert_eq!(
        err.kind,
        ValidationErrorKind::TooManyItems { count: 5, max: 4 }
    );
}

#[test]
fn test_logit_bias_key_must_be_token_id() {
    let mut conversation = valid_conversation();
    conversation.logit_bias = Some([("hello".to_string(), 1)].into_iter().collect());
    let err = conversation.validate().unwrap_err();
    assert_eq!(err.field_path, "logit_bias.hello");
    assert!(matches!(err.kind, ValidationErrorKind::InvalidFormat { .. }));
}

#[test]
fn test_message_errors_carry_index() {
    let mut conversation = valid_conversation();
    conversation.messages[3].name = None;
    let err = conversation.validate().unwrap_err();
    assert_eq!(err.field_path, "messages[3].name");
    assert_eq!(err.kind, ValidationErrorKind::RequiredFieldMissing);
}

#[test_case(ChatRole::System ; "system")]
#[test_case(ChatRole::User ; "user")]
#[test_case(ChatRole::Assistant ; "assistant")]
fn test_content_required_without_function_call(role: ChatRole) {
    let message = MessageBuilder::new(role).build();
    let err = message.validate().unwrap_err();
    assert_eq!(err.field_path, "content");
}

#[test]
fn test_assistant_function_call_may_omit_content() {
    let message = ChatMessage::function_call("lookup", "{}");
    assert!(message.validate().is_ok());

    // A user message carrying a call still needs content
    let message = MessageBuilder::new(ChatRole::User)
        .with_function_call("lookup", "{}")
        .build();
    assert!(message.validate().is_err());
}

#[test_case("get_weather", true ; "snake case")]
#[test_case("get-weather-2", true ; "dashes and digits")]
#[test_case("get weather", false ; "space")]
#[test_case("météo", false ; "non ascii")]
#[test_case("", false ; "empty")]
fn test_name_format(name: &str, ok: bool) {
    let message = ChatMessage::function(name, "{}");
    assert_eq!(message.validate().is_ok(), ok);

    let function = ChatFunctions::<ParameterSchema>::new(name);
    assert_eq!(function.validate().is_ok(), ok);
}

#[test]
fn test_name_length_limit() {
    let message = ChatMessage::function("f".repeat(65), "{}");
    let err = message.validate().unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::TooLong { length: 65, max: 64 });
}

#[test]
fn test_function_call_name_is_checked() {
    let message = ChatMessage::function_call("", "{}");
    let err = message.validate().unwrap_err();
    assert_eq!(err.field_path, "function_call.name");
}

#[test]
fn test_parameters_need_type_tag() {
    let function = ChatFunctions::new("search")
        .with_parameters(serde_json::json!({"properties": {"q": {"type": "string"}}}));
    let err = function.validate().unwrap_err();
    assert_eq!(err.field_path, "parameters.type");

    let function =
        ChatFunctions::new("search").with_parameters(serde_json::json!({"type": "object"}));
    assert!(function.validate().is_ok());
}

#[test]
fn test_empty_model_and_messages() {
    let err = ChatConversation::new("", vec![ChatMessage::user("hi")])
        .validate()
        .unwrap_err();
    assert_eq!(err.field_path, "model");

    let err = ChatConversation::new("gpt-4", vec![]).validate().unwrap_err();
    assert_eq!(err.field_path, "messages");
}

fn function_request() -> ChatConversationFunction {
    valid_conversation()
        .with_functions(vec![
            ChatFunctions::new("get_weather").with_parameters(ParameterSchema::object()),
            ChatFunctions::new("get_time"),
        ])
}

#[test]
fn test_function_request_modes() {
    assert!(function_request().validate().is_ok());
    assert!(function_request()
        .with_function_call(FunctionCallChoice::none())
        .validate()
        .is_ok());
    assert!(function_request()
        .with_function_call(FunctionCallChoice::function("get_time"))
        .validate()
        .is_ok());

    let err = function_request()
        .with_function_call(FunctionCallChoice::Mode("sometimes".to_string()))
        .validate()
        .unwrap_err();
    assert_eq!(err.field_path, "function_call");
}

#[test]
fn test_forced_function_must_be_declared() {
    let err = function_request()
        .with_function_call(FunctionCallChoice::function("get_stock_price"))
        .validate()
        .unwrap_err();
    assert_eq!(err.field_path, "function_call.name");
    assert_eq!(
        err.kind,
        ValidationErrorKind::UnknownReference {
            name: "get_stock_price".to_string()
        }
    );
}

#[test]
fn test_duplicate_function_names() {
    let err = function_request()
        .with_function(ChatFunctions::new("get_time"))
        .validate()
        .unwrap_err();
    assert_eq!(err.field_path, "functions[2].name");
    assert!(matches!(err.kind, ValidationErrorKind::DuplicateValue { .. }));
}

#[test]
fn test_invalid_function_definition_path() {
    let err = function_request()
        .with_function(ChatFunctions::new("bad name"))
        .validate()
        .unwrap_err();
    assert_eq!(err.field_path, "functions[2].name");
}

#[test]
fn test_decoding_does_not_validate() {
    // Violates the documented rules but still decodes
    let conversation: ChatConversation = serde_json::from_str(
        r#"{"model":"gpt-4","messages":[{"role":"function"}],"temperature":9.5}"#,
    )
    .unwrap();
    assert!(conversation.validate().is_err());
}
