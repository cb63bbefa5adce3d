//! The single chat session a shell drives.
//!
//! `ChatSession` owns the live [`Conversation`] and threads it through the
//! composer, the gateway and the store. Every mutating call hands back the
//! resulting state so the caller can re-render from it.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::conversation::Conversation;
use crate::gateway::CompletionGateway;
use crate::prompt::PromptComposer;
use crate::storage::{SnapshotId, SnapshotStore, StoreError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("the question is empty")]
    EmptyQuestion,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub struct ChatSession {
    conversation: Conversation,
    current_snapshot: Option<SnapshotId>,
    composer: PromptComposer,
    store: Arc<dyn SnapshotStore>,
    gateway: Arc<dyn CompletionGateway>,
}

impl ChatSession {
    pub fn new(store: Arc<dyn SnapshotStore>, gateway: Arc<dyn CompletionGateway>) -> Self {
        Self {
            conversation: Conversation::new(),
            current_snapshot: None,
            composer: PromptComposer::default(),
            store,
            gateway,
        }
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Snapshot the conversation was last loaded from or saved to.
    pub fn current_snapshot(&self) -> Option<&SnapshotId> {
        self.current_snapshot.as_ref()
    }

    /// Replaces the document text used as context for later questions.
    pub fn set_document(&mut self, text: impl Into<String>) -> &Conversation {
        self.conversation.set_document_text(text);
        &self.conversation
    }

    /// Sends `question` through the gateway and records the exchange.
    ///
    /// The composed request carries the trimmed question; the recorded user
    /// turn keeps the text as typed.
    ///
    /// A gateway failure does not fail the call: its display text becomes
    /// the assistant turn, in the transcript and in the history sent with
    /// later questions.
    pub async fn ask(&mut self, question: &str) -> Result<&Conversation> {
        if question.trim().is_empty() {
            return Err(SessionError::EmptyQuestion);
        }

        let request = self.composer.compose(
            question,
            &self.conversation.document_text,
            &self.conversation.conversation_history,
        );

        log::debug!(
            "Sending question ({} chars, {} history turns, document context: {})",
            request.question.chars().count(),
            request.history.len(),
            self.conversation.has_document()
        );

        let started = Instant::now();
        let reply = match self.gateway.complete(&request).await {
            Ok(answer) => {
                log::info!("Answer received in {:?}", started.elapsed());
                answer
            }
            Err(error) => {
                log::warn!(
                    "Completion failed after {:?} ({:?}): {}",
                    started.elapsed(),
                    error.kind(),
                    error
                );
                error.display_text()
            }
        };

        self.conversation.append(question, reply);
        Ok(&self.conversation)
    }

    /// Starts over with an empty conversation and no document.
    pub fn new_conversation(&mut self) -> &Conversation {
        self.conversation = Conversation::new();
        self.current_snapshot = None;
        &self.conversation
    }

    pub async fn save(&mut self) -> Result<SnapshotId> {
        let id = self.store.save(&self.conversation).await?;
        self.current_snapshot = Some(id.clone());
        Ok(id)
    }

    /// Replaces the live conversation with a stored one. On failure the live
    /// conversation is left as it was.
    pub async fn load(&mut self, id: &SnapshotId) -> Result<&Conversation> {
        let conversation = self.store.load(id).await?;
        self.conversation = conversation;
        self.current_snapshot = Some(id.clone());
        Ok(&self.conversation)
    }

    pub async fn list(&self) -> Result<Vec<SnapshotId>> {
        Ok(self.store.list().await?)
    }

    /// Deletes a stored snapshot. The live conversation is kept even when it
    /// came from that snapshot.
    pub async fn delete(&mut self, id: &SnapshotId) -> Result<()> {
        self.store.delete(id).await?;
        if self.current_snapshot.as_ref() == Some(id) {
            self.current_snapshot = None;
        }
        Ok(())
    }

    pub async fn delete_all(&mut self) -> Result<usize> {
        let removed = self.store.delete_all().await?;
        self.current_snapshot = None;
        Ok(removed)
    }

    pub async fn gateway_reachable(&self) -> bool {
        self.gateway.is_reachable().await
    }
}
