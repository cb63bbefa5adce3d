use std::sync::Arc;

use papermind_core::{ChatSession, CompletionGateway};
use tokio::sync::Mutex;

/// One running shell serves one conversation; requests take turns on it.
pub struct AppState {
    pub session: Mutex<ChatSession>,
    pub gateway: Arc<dyn CompletionGateway>,
    pub gateway_url: String,
}

impl AppState {
    pub fn new(
        session: ChatSession,
        gateway: Arc<dyn CompletionGateway>,
        gateway_url: impl Into<String>,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            gateway,
            gateway_url: gateway_url.into(),
        }
    }
}
