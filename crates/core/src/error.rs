//! Error types for the careerchat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Turn-fatal failures surface as [`Error`]; notification and knowledge
//! failures have their own types because they are recovered locally.

use std::path::PathBuf;
use thiserror::Error;

/// The turn-level error type returned by the dialogue engine.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion errors ---
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// The model kept requesting tools past the configured cap.
    #[error("Unable to complete the request: tool loop exceeded {limit} iterations")]
    ToolLoopExceeded { limit: u32 },

    /// Caller-supplied history breaks the conversation invariants.
    #[error("Invalid conversation history: {0}")]
    InvalidHistory(String),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short machine-readable kind, used by outer surfaces.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Completion(_) => "completion",
            Error::Tool(ToolError::UnknownTool(_)) => "unknown_tool",
            Error::Tool(ToolError::InvalidArguments { .. }) => "invalid_arguments",
            Error::ToolLoopExceeded { .. } => "tool_loop_exceeded",
            Error::InvalidHistory(_) => "invalid_history",
            Error::Internal(_) => "internal",
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Completion request timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("Notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Notification network error: {0}")]
    Network(String),

    #[error("Notification timed out after {after_secs}s")]
    Timeout { after_secs: u64 },
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Knowledge source not found: {}", path.display())]
    SourceMissing { path: PathBuf },

    #[error("Failed to read knowledge source {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Failed to extract text from {}: {reason}", path.display())]
    Extraction { path: PathBuf, reason: String },
}
