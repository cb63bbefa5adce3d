pub mod gateway_client;
pub mod provider;
pub mod providers;

pub use gateway_client::HttpGateway;
pub use provider::{LLMError, LLMProvider, Result};
pub use providers::OpenAIProvider;
