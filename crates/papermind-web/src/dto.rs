use papermind_core::{ChatSession, Turn, GREETING};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient message shown next to the transcript, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything the page needs to redraw after any call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub messages: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    pub document_chars: usize,
    pub current_snapshot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl SessionView {
    pub fn from_session(session: &ChatSession) -> Self {
        let conversation = session.conversation();
        Self {
            messages: conversation.messages.clone(),
            greeting: conversation.is_empty().then(|| GREETING.to_string()),
            document_chars: conversation.document_chars(),
            current_snapshot: session.current_snapshot().map(ToString::to_string),
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadedDocument {
    pub name: String,
    /// Base64 file content; a `data:...;base64,` prefix is accepted.
    pub content_base64: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub files: Vec<UploadedDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotList {
    pub snapshots: Vec<String>,
    pub current: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusView {
    pub gateway_url: String,
    pub gateway_reachable: bool,
}
