//! Build a function-calling request, then read the model's call back out of a
//! completion body.

use chatwire_core::codec;
use chatwire_core::protocol::*;
use chatwire_core::validation::Validate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    location: String,
    #[serde(default)]
    unit: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("chatwire_core=debug")
        .init();

    let request = ChatConversation::new(
        "gpt-3.5-turbo-0613",
        vec![ChatMessage::user("What's the weather like in Boston?")],
    )
    .with_temperature(0.0)
    .with_functions(vec![
        ChatFunctions::new("get_current_weather")
            .with_description("Get the current weather in a given location")
            .with_parameters(
                ParameterSchema::object()
                    .with_property("location", ParameterSchema::string(), true)
                    .with_property(
                        "unit",
                        ParameterSchema::string().with_enum(["celsius", "fahrenheit"]),
                        false,
                    ),
            ),
    ]);
    request.validate()?;

    println!("Request:\n{}", codec::encode_pretty(&request)?);

    let body = r#"{
        "id": "chatcmpl-7QyqpwdfhqwajicIEznoc6Q47XAyW",
        "object": "chat.completion",
        "created": 1686753047,
        "model": "gpt-3.5-turbo-0613",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "function_call": {
                    "name": "get_current_weather",
                    "arguments": "{\n  \"location\": \"Boston, MA\"\n}"
                }
            },
            "finish_reason": "function_call"
        }]
    }"#;

    let completion = codec::decode_completion(body)?;
    if let Some(call) = completion.function_call() {
        let args: WeatherArgs = call.parse_arguments()?;
        println!(
            "Model asked for {} in {} ({})",
            call.name,
            args.location,
            args.unit.as_deref().unwrap_or("default unit")
        );
    }

    Ok(())
}
