//! Built-in tool implementations for careerchat.
//!
//! Both tools are lead-capture side effects: they forward what the model
//! recorded to the operator's [`NotificationSink`] and answer
//! `{"recorded": "ok"}`.

pub mod record_unknown_question;
pub mod record_user_details;

use std::sync::Arc;

use careerchat_core::notify::NotificationSink;
use careerchat_core::tool::ToolRegistry;

pub use record_unknown_question::RecordUnknownQuestionTool;
pub use record_user_details::RecordUserDetailsTool;

/// Create the registry holding both built-in tools, sharing one sink.
pub fn default_registry(sink: Arc<dyn NotificationSink>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(RecordUserDetailsTool::new(sink.clone())));
    registry.register(Box::new(RecordUnknownQuestionTool::new(sink)));
    registry
}
