pub mod types;

pub use types::{Conversation, Role, Turn};

/// Shown by the shells while a conversation has no messages. Never stored.
pub const GREETING: &str = "Hello! Upload a PDF and ask me questions about its content.";
