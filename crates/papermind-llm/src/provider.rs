use async_trait::async_trait;
use papermind_core::Turn;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Unexpected response from the model: {0}")]
    MissingChoices(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// A model-serving backend that completes a chat in one round trip.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Complete `messages` and return the generated text.
    ///
    /// The last message is the question being asked; everything before it
    /// is prior conversation, oldest first.
    async fn chat(&self, messages: &[Turn]) -> Result<String>;

    fn model(&self) -> &str;
}
