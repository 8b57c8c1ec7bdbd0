//! # Roundtable Core
//!
//! Domain types, traits, and error definitions for the Roundtable multi-agent
//! runtime. This crate has **zero framework dependencies**: it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here (completion backend,
//! tool). Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod backend;
pub mod error;
pub mod message;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use backend::{
    Completion, CompletionBackend, CompletionRequest, PromptMessage, PromptRole, ToolCallRequest,
    ToolDefinition, Usage,
};
pub use error::{BackendError, SearchError, TeamError, ToolError};
pub use message::{Author, Conversation, ConversationId, Message, MessageKind};
pub use tool::{Tool, ToolOutcome, ToolRegistry};
