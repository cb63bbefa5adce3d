pub mod config;
pub mod conversation;
pub mod gateway;
pub mod logging;
pub mod prompt;
pub mod session;
pub mod storage;

pub use config::{BackendConfig, Config, ConfigError};
pub use conversation::{Conversation, Role, Turn, GREETING};
pub use gateway::{CompletionGateway, ErrorKind, GatewayError};
pub use prompt::{compose, excerpt, PromptComposer, Request, DEFAULT_CONTEXT_CHARS, ELLIPSIS};
pub use session::{ChatSession, SessionError};
pub use storage::{FileSnapshotStore, SnapshotId, SnapshotStore, StoreError};
