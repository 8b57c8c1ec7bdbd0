//! Transcript sink: where produced messages go for display.
//!
//! The dispatch loop knows nothing about terminals or chat UIs; it emits
//! messages, and a sink turns them into whatever the surface needs.

use async_trait::async_trait;
use roundtable_core::message::Message;
use thiserror::Error;

/// One display event for the chat surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEvent {
    /// Who the content is attributed to
    pub author: String,

    /// The text to display
    pub content: String,
}

impl DisplayEvent {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
        }
    }

    /// Build a display event from a produced message.
    pub fn from_message(message: &Message) -> Self {
        Self {
            author: message.author.to_string(),
            content: message.content.clone(),
        }
    }
}

/// Errors delivering display events to the surface.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to deliver display event: {0}")]
    DeliveryFailed(String),
}

/// A chat surface: a terminal, a web UI, a test buffer.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    async fn deliver(&self, event: DisplayEvent) -> Result<(), SinkError>;
}
