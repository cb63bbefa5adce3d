//! OpenAI-compatible chat completion helpers.
//!
//! Local model servers (text-generation-webui, LM Studio, llama.cpp) accept the
//! OpenAI chat completions shape. Only the non-streaming subset is used here.

use papermind_core::Turn;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::provider::{LLMError, Result};

pub fn build_openai_compat_body(model: &str, messages: &[Turn], temperature: f32) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "temperature": temperature,
    })
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pulls the first choice's text out of a completion body.
///
/// A body without `choices`, or with an empty list, is reported with the raw
/// body attached so the caller can see what the server actually said.
pub fn parse_openai_compat_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)?;

    if value.get("choices").is_none() {
        return Err(LLMError::MissingChoices(body.to_string()));
    }

    let response: CompletionResponse = serde_json::from_value(value)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| LLMError::MissingChoices(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_model_messages_and_temperature() {
        let messages = vec![
            Turn::user("Hi"),
            Turn::assistant("Hello!"),
            Turn::user("Summarize the paper"),
        ];

        let body = build_openai_compat_body("llama", &messages, 0.2);

        assert_eq!(body["model"], "llama");
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][2]["role"], "user");
        assert_eq!(body["messages"][2]["content"], "Summarize the paper");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn parses_first_choice() {
        let body = r#"{"id":"chatcmpl-1","choices":[{"index":0,"message":{"role":"assistant","content":"Light into energy."},"finish_reason":"stop"}]}"#;
        assert_eq!(
            parse_openai_compat_response(body).unwrap(),
            "Light into energy."
        );
    }

    #[test]
    fn missing_choices_keeps_raw_body() {
        let body = r#"{"error":{"message":"model not loaded"}}"#;

        match parse_openai_compat_response(body) {
            Err(LLMError::MissingChoices(raw)) => assert!(raw.contains("model not loaded")),
            other => panic!("expected MissingChoices, got {:?}", other),
        }
    }

    #[test]
    fn empty_choices_is_missing_choices() {
        assert!(matches!(
            parse_openai_compat_response(r#"{"choices":[]}"#),
            Err(LLMError::MissingChoices(_))
        ));
    }

    #[test]
    fn invalid_json_is_json_error() {
        assert!(matches!(
            parse_openai_compat_response("{not valid json}"),
            Err(LLMError::Json(_))
        ));
    }
}
