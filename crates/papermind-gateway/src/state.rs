use std::sync::Arc;

use papermind_core::BackendConfig;
use papermind_llm::{LLMProvider, OpenAIProvider};

pub struct AppState {
    pub llm: Arc<dyn LLMProvider>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self { llm }
    }

    pub fn from_backend(backend: &BackendConfig) -> Self {
        log::info!(
            "Creating LLM provider with base URL: {} and model: {}",
            backend.base_url,
            backend.model
        );

        let provider = OpenAIProvider::new()
            .with_base_url(backend.base_url.clone())
            .with_model(backend.model.clone())
            .with_temperature(backend.temperature)
            .with_api_key(backend.api_key.clone());

        Self::new(Arc::new(provider))
    }
}
