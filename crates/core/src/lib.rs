//! # careerchat core
//!
//! Domain types, traits, and error definitions for the careerchat persona
//! assistant. This crate has **no I/O**. It defines the domain model that
//! every other crate implements against.
//!
//! ## Design
//!
//! Each external boundary is a trait here, implemented elsewhere:
//! - [`CompletionClient`]: the chat-completion provider
//! - [`NotificationSink`]: the operator notification channel
//! - [`Tool`]: a side-effecting capability the model may invoke

pub mod completion;
pub mod error;
pub mod knowledge;
pub mod message;
pub mod notify;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use completion::{
    Completion, CompletionClient, CompletionRequest, CompletionResponse, ToolDefinition, Usage,
};
pub use error::{CompletionError, Error, KnowledgeError, NotifyError, Result, ToolError};
pub use knowledge::KnowledgeContext;
pub use message::{Conversation, Message, Role, ToolCallRequest, ToolResult};
pub use notify::{DeliveryStatus, NotificationSink};
pub use tool::{ParamSpec, ParamType, Tool, ToolRegistry, ToolSpec};
