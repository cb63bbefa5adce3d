use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a conversation. Turns are never edited after they are appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// In-memory state of one chat session.
///
/// `messages` is what the shells render, `conversation_history` is what the
/// completion gateway is shown. Both grow in lockstep through [`Conversation::append`].
/// The serialized layout is the snapshot file format: the document text is
/// stored under its historical `pdf_text` key, and snapshots written before
/// `conversation_history` existed load with an empty history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    pub messages: Vec<Turn>,
    #[serde(rename = "pdf_text")]
    pub document_text: String,
    #[serde(default)]
    pub conversation_history: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation with no messages has nothing worth saving, even if a
    /// document is attached.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Records one exchange: the user turn first, then the assistant turn, in
    /// both the display list and the API history.
    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let user = Turn::user(question);
        let assistant = Turn::assistant(answer);

        self.messages.reserve(2);
        self.conversation_history.reserve(2);

        self.messages.push(user.clone());
        self.messages.push(assistant.clone());
        self.conversation_history.push(user);
        self.conversation_history.push(assistant);
    }

    pub fn set_document_text(&mut self, text: impl Into<String>) {
        self.document_text = text.into();
    }

    pub fn has_document(&self) -> bool {
        !self.document_text.trim().is_empty()
    }

    pub fn document_chars(&self) -> usize {
        self.document_text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_adds_user_then_assistant_to_both_lists() {
        let mut conversation = Conversation::new();
        conversation.append("first question", "first answer");
        conversation.append("second question", "second answer");

        assert_eq!(conversation.messages.len(), 4);
        assert_eq!(conversation.conversation_history.len(), 4);
        assert_eq!(conversation.messages[2], Turn::user("second question"));
        assert_eq!(conversation.messages[3], Turn::assistant("second answer"));
        assert_eq!(conversation.messages, conversation.conversation_history);
    }

    #[test]
    fn append_keeps_prior_turns_untouched() {
        let mut conversation = Conversation::new();
        conversation.append("q1", "a1");
        let before = conversation.messages.clone();

        conversation.append("q2", "a2");

        assert_eq!(&conversation.messages[..2], &before[..]);
    }

    #[test]
    fn serializes_document_text_under_pdf_text_key() {
        let mut conversation = Conversation::new();
        conversation.set_document_text("page one");
        conversation.append("hi", "hello");

        let value = serde_json::to_value(&conversation).unwrap();

        assert_eq!(value["pdf_text"], "page one");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["conversation_history"][1]["role"], "assistant");
        assert!(value.get("document_text").is_none());
    }

    #[test]
    fn missing_history_defaults_to_empty() {
        let json = r#"{
            "messages": [{"role": "user", "content": "hi"}, {"role": "assistant", "content": "hello"}],
            "pdf_text": ""
        }"#;

        let conversation: Conversation = serde_json::from_str(json).unwrap();

        assert_eq!(conversation.messages.len(), 2);
        assert!(conversation.conversation_history.is_empty());
    }

    #[test]
    fn missing_messages_is_rejected() {
        let json = r#"{"pdf_text": "text"}"#;
        assert!(serde_json::from_str::<Conversation>(json).is_err());
    }

    #[test]
    fn document_chars_counts_characters_not_bytes() {
        let mut conversation = Conversation::new();
        conversation.set_document_text("fotosíntesis");
        assert_eq!(conversation.document_chars(), 12);
        assert!(conversation.has_document());

        conversation.set_document_text("  \n ");
        assert!(!conversation.has_document());
    }
}
