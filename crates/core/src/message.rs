//! Message and Conversation domain types.
//!
//! These are the core value objects that flow through the entire system:
//! the user's task enters as a message → agents take turns appending messages
//! → termination policies read the conversation → the transcript sink
//! forwards messages to the chat surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation (one dispatch run).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// The end user who posed the task
    User,
    /// Loop/system machinery
    System,
    /// A named agent in the roster
    Agent(String),
}

impl Author {
    pub fn agent(name: impl Into<String>) -> Self {
        Self::Agent(name.into())
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Author::User => write!(f, "user"),
            Author::System => write!(f, "system"),
            Author::Agent(name) => write!(f, "{name}"),
        }
    }
}

/// What a message carries. Consumers switch on this tag rather than probing
/// the content shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain text produced by the user or an agent
    Text,
    /// An agent's request to invoke a tool, rendered for the transcript
    ToolCall,
    /// A tool's return value, coerced to string for display
    ToolResult,
    /// A failed tool invocation or backend call, surfaced in-run
    ToolError,
}

/// A single message in a conversation. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who produced this message
    pub author: Author,

    /// Tagged variant of the payload
    pub kind: MessageKind,

    /// The text content (structured payloads are JSON-encoded)
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(author: Author, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author,
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create the user's task message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Author::User, MessageKind::Text, content)
    }

    /// Create a plain-text message from a named agent.
    pub fn agent_text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Author::agent(name), MessageKind::Text, content)
    }

    /// Create a tool-call request message from a named agent.
    pub fn tool_call(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Author::agent(name), MessageKind::ToolCall, content)
    }

    /// Create a tool-result message from a named agent.
    pub fn tool_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Author::agent(name), MessageKind::ToolResult, content)
    }

    /// Create a tool-error message from a named agent.
    pub fn tool_error(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Author::agent(name), MessageKind::ToolError, content)
    }
}

/// An ordered, append-only sequence of messages. Owned exclusively by one
/// dispatch run; never mutated outside [`Conversation::push`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// Ordered messages (insertion order = causal order)
    pub messages: Vec<Message>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was appended
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// Number of messages appended so far.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Render the conversation as attributed lines, one per message, for
    /// inclusion in a backend prompt.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for msg in &self.messages {
            out.push_str(&format!("{}: {}\n", msg.author, msg.content));
        }
        out
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
