//! CompletionClient trait: the boundary to the language-model provider.
//!
//! A client takes a conversation plus the tool definitions and returns
//! either a final answer or a batch of tool-call requests. The outcome is
//! a two-variant enum so the dialogue loop never inspects raw finish
//! reasons.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::CompletionError;
use crate::message::{Message, ToolCallRequest};

/// A request sent to the completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "llama3.2", "gpt-4o-mini")
    pub model: String,

    /// The conversation messages, system message first
    pub messages: Vec<Message>,

    /// Available tools, in registration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A tool definition sent to the model so it knows what it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// What the model decided to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The model is done; this is the answer.
    FinalMessage(String),

    /// The model wants these tools executed before it continues.
    ToolRequest {
        /// Any text the model emitted alongside the calls
        content: Option<String>,
        calls: Vec<ToolCallRequest>,
    },
}

/// A complete response from a provider.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub completion: Completion,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// A final answer with no usage metadata.
    pub fn final_message(text: impl Into<String>) -> Self {
        Self {
            completion: Completion::FinalMessage(text.into()),
            model: String::new(),
            usage: None,
        }
    }

    /// A tool request with no usage metadata.
    pub fn tool_request(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            completion: Completion::ToolRequest {
                content: None,
                calls,
            },
            model: String::new(),
            usage: None,
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core CompletionClient trait.
///
/// Every chat-completion backend implements this. The dialogue engine
/// calls `complete()` without knowing which provider is behind it.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A human-readable name for this client (e.g., "ollama", "openai").
    fn name(&self) -> &str;

    /// Send a request and get the model's decision.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "record_unknown_question".into(),
            description: "Record an unanswered question".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": { "question": { "type": "string" } },
                "required": ["question"]
            }),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("record_unknown_question"));
        assert!(json.contains("question"));
    }

    #[test]
    fn response_constructors() {
        let done = CompletionResponse::final_message("hi");
        assert_eq!(done.completion, Completion::FinalMessage("hi".into()));

        let calls = vec![ToolCallRequest {
            id: "c1".into(),
            name: "x".into(),
            arguments: "{}".into(),
        }];
        let more = CompletionResponse::tool_request(calls.clone());
        assert_eq!(
            more.completion,
            Completion::ToolRequest {
                content: None,
                calls
            }
        );
    }
}
