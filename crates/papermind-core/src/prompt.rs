//! Prompt composition.
//!
//! The composed question carries a truncated excerpt of the document text;
//! the conversation history travels alongside it as structured turns and is
//! never folded into the question text.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::conversation::Turn;

/// Characters of document text injected into each question.
pub const DEFAULT_CONTEXT_CHARS: usize = 2000;

/// Appended to the excerpt when the document was cut short.
pub const ELLIPSIS: &str = "...";

const CONTEXT_LABEL: &str = "Document context:";
const QUESTION_LABEL: &str = "Question:";

/// Payload for the completion gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    pub question: String,
    pub history: Vec<Turn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptComposer {
    context_chars: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_CHARS)
    }
}

impl PromptComposer {
    pub fn new(context_chars: usize) -> Self {
        Self { context_chars }
    }

    /// Builds the request for `question`.
    ///
    /// Callers reject empty questions before getting here; the question is
    /// only trimmed. When `document_text` is blank the question goes out
    /// unwrapped.
    pub fn compose(&self, question: &str, document_text: &str, history: &[Turn]) -> Request {
        let question = question.trim();

        let composed = if document_text.trim().is_empty() {
            question.to_string()
        } else {
            let context = excerpt(document_text, self.context_chars);
            format!("{CONTEXT_LABEL}\n{context}\n\n{QUESTION_LABEL} {question}")
        };

        Request {
            question: composed,
            history: history.to_vec(),
        }
    }
}

/// Composes with the default context size.
pub fn compose(question: &str, document_text: &str, history: &[Turn]) -> Request {
    PromptComposer::default().compose(question, document_text, history)
}

/// First `limit` characters of `text`, followed by [`ELLIPSIS`] only when
/// something was cut.
pub fn excerpt(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((byte_offset, _)) => Cow::Owned(format!("{}{}", &text[..byte_offset], ELLIPSIS)),
        None => Cow::Borrowed(text),
    }
}
