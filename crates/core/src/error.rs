//! Error types for the Roundtable domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// Errors from the completion backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by backend, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors from the search provider.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Search request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors from tool registration and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    #[error("Tool execution failed in {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),
}

/// Errors that end a dispatch run with no TaskResult.
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("Selection error: selector named unknown agent {name:?}")]
    Selection { name: String },

    #[error("Selection call failed: {0}")]
    SelectionCall(#[from] BackendError),

    #[error("Roster is empty")]
    EmptyRoster,

    #[error("Duplicate agent name in roster: {0}")]
    DuplicateAgent(String),
}
