//! Client side of the completion gateway's `POST /chat` contract.

use std::time::Duration;

use async_trait::async_trait;
use papermind_core::{CompletionGateway, GatewayError, Request, Turn};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct ChatPayload<'a> {
    question: &'a str,
    history: &'a [Turn],
    user_id: &'a str,
}

pub struct HttpGateway {
    client: Client,
    base_url: String,
    user_id: String,
    timeout: Duration,
    health_timeout: Duration,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: user_id.into(),
            timeout: Duration::from_secs(60),
            health_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify(&self, error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::Timeout
        } else if error.is_connect() {
            GatewayError::Connection {
                url: self.base_url.clone(),
            }
        } else {
            GatewayError::Transport(error.to_string())
        }
    }

    /// True when the gateway answers anything at all on its root.
    pub async fn health(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .await;

        match result {
            Ok(_) => true,
            Err(error) => {
                log::debug!("Gateway health check failed: {}", error);
                false
            }
        }
    }
}

#[async_trait]
impl CompletionGateway for HttpGateway {
    async fn complete(&self, request: &Request) -> Result<String, GatewayError> {
        let payload = ChatPayload {
            question: &request.question,
            history: &request.history,
            user_id: &self.user_id,
        };

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|_| GatewayError::MalformedResponse)?;

        if let Some(answer) = body.get("response").and_then(Value::as_str) {
            return Ok(answer.to_string());
        }
        if let Some(error) = body.get("error") {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(GatewayError::Reported(message));
        }

        Err(GatewayError::MalformedResponse)
    }

    async fn is_reachable(&self) -> bool {
        self.health().await
    }
}
