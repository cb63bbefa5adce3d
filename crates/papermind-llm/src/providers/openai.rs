use async_trait::async_trait;
use papermind_core::Turn;
use reqwest::Client;

use crate::provider::{LLMError, LLMProvider, Result};

use super::common::openai_compat::{build_openai_compat_body, parse_openai_compat_response};

pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl Default for OpenAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenAIProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            api_key: None,
            base_url: "http://127.0.0.1:5000/v1".to_string(),
            model: "Meta-Llama-3.1-8B-Instruct.Q4_K_M.gguf".to_string(),
            temperature: 0.2,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Local servers usually need no key; blank keys are treated as none.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(&self, messages: &[Turn]) -> Result<String> {
        let body = build_openai_compat_body(&self.model, messages, self.temperature);

        let mut request = self.client.post(self.completions_url()).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(LLMError::Api(format!("HTTP {}: {}", status, text)));
        }

        let text = response.text().await?;
        parse_openai_compat_response(&text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_values() {
        let provider = OpenAIProvider::new();
        assert_eq!(provider.base_url, "http://127.0.0.1:5000/v1");
        assert_eq!(provider.model, "Meta-Llama-3.1-8B-Instruct.Q4_K_M.gguf");
        assert_eq!(provider.temperature, 0.2);
        assert!(provider.api_key.is_none());
    }

    #[test]
    fn test_chained_builders() {
        let provider = OpenAIProvider::new()
            .with_base_url("http://localhost:1234/v1/")
            .with_model("qwen")
            .with_temperature(0.5)
            .with_api_key(Some("sk-local".to_string()));

        assert_eq!(provider.completions_url(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(provider.model(), "qwen");
        assert_eq!(provider.temperature, 0.5);
        assert_eq!(provider.api_key.as_deref(), Some("sk-local"));
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let provider = OpenAIProvider::new().with_api_key(Some("   ".to_string()));
        assert!(provider.api_key.is_none());
    }

    #[tokio::test]
    async fn test_chat_posts_history_then_question() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "messages": [
                    {"role": "user", "content": "earlier"},
                    {"role": "assistant", "content": "reply"},
                    {"role": "user", "content": "now"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "answer"}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::new()
            .with_base_url(format!("{}/v1", mock_server.uri()))
            .with_model("test-model");

        let answer = provider
            .chat(&[
                Turn::user("earlier"),
                Turn::assistant("reply"),
                Turn::user("now"),
            ])
            .await
            .unwrap();

        assert_eq!(answer, "answer");
    }

    #[tokio::test]
    async fn test_api_key_sent_as_bearer() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::new()
            .with_base_url(mock_server.uri())
            .with_api_key(Some("sk-test".to_string()));

        assert_eq!(provider.chat(&[Turn::user("hi")]).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::new().with_base_url(mock_server.uri());
        let result = provider.chat(&[Turn::user("hi")]).await;

        match result {
            Err(LLMError::Api(message)) => {
                assert!(message.contains("503"));
                assert!(message.contains("model loading"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_body_without_choices_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"detail": "nope"})),
            )
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::new().with_base_url(mock_server.uri());
        let result = provider.chat(&[Turn::user("hi")]).await;

        assert!(matches!(result, Err(LLMError::MissingChoices(_))));
    }
}
