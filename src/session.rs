//! Append-only query-session transcript.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::document::Citation;

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message author.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Source citations, present on grounded assistant replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Citation>>,
}

impl Message {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into(), sources: None }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), sources: None }
    }

    /// An assistant message without citations.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), sources: None }
    }

    /// An assistant message carrying its source citations.
    pub fn assistant_with_sources(content: impl Into<String>, sources: Vec<Citation>) -> Self {
        Self { role: Role::Assistant, content: content.into(), sources: Some(sources) }
    }
}

/// An append-only message transcript.
///
/// Writes go through a single lock; readers take a consistent snapshot.
/// Messages are never deleted or edited.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: RwLock<Vec<Message>>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript seeded with a system message.
    pub fn seeded(system_prompt: impl Into<String>) -> Self {
        Self { messages: RwLock::new(vec![Message::system(system_prompt)]) }
    }

    /// Append a message.
    pub async fn push(&self, message: Message) {
        self.messages.write().await.push(message);
    }

    /// Snapshot of all messages in order.
    pub async fn messages(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }

    /// Number of messages.
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    /// Whether the transcript has no messages.
    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_transcript_starts_with_the_system_message() {
        let transcript = Transcript::seeded("You are an operations assistant.");
        let messages = transcript.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::System);
    }

    #[tokio::test]
    async fn messages_append_in_order() {
        let transcript = Transcript::new();
        transcript.push(Message::user("how long do we proof rolls?")).await;
        transcript
            .push(Message::assistant_with_sources(
                "About 45 minutes.",
                vec![Citation { doc_id: "d1".into(), page: 12 }],
            ))
            .await;

        let messages = transcript.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].sources.as_ref().unwrap()[0].page, 12);
    }
}
