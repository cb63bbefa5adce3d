use async_trait::async_trait;
use thiserror::Error;

use crate::prompt::Request;

/// Coarse grouping used by shells that only care about the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Timeout,
    UpstreamProtocol,
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("cannot connect to the completion gateway at {url}")]
    Connection { url: String },

    #[error("the completion gateway took too long to respond")]
    Timeout,

    #[error("completion gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion gateway reported an error: {0}")]
    Reported(String),

    #[error("unexpected response from the completion gateway")]
    MalformedResponse,

    #[error("request to the completion gateway failed: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Connection { .. } => ErrorKind::Connection,
            GatewayError::Timeout => ErrorKind::Timeout,
            GatewayError::Status { .. }
            | GatewayError::Reported(_)
            | GatewayError::MalformedResponse
            | GatewayError::Transport(_) => ErrorKind::UpstreamProtocol,
        }
    }

    /// Text shown in the transcript in place of an answer.
    pub fn display_text(&self) -> String {
        match self {
            GatewayError::Connection { url } => format!(
                "⚠️ Error: cannot connect to the API. Make sure it is running at {}",
                url
            ),
            GatewayError::Timeout => {
                "⚠️ Error: Timeout - the API took too long to respond".to_string()
            }
            GatewayError::Status { status, body } => {
                format!("⚠️ API error ({}): {}", status, body)
            }
            GatewayError::Reported(message) => format!("⚠️ Error: {}", message),
            GatewayError::MalformedResponse => "⚠️ Unexpected response from the API".to_string(),
            GatewayError::Transport(message) => format!("⚠️ Unexpected error: {}", message),
        }
    }
}

/// The relay that turns a composed [`Request`] into an answer.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, request: &Request) -> Result<String, GatewayError>;

    /// Cheap liveness probe for status banners.
    async fn is_reachable(&self) -> bool {
        true
    }
}
