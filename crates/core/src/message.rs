//! Message and Conversation domain types.
//!
//! These are the value objects that flow through a turn:
//! UI sends a message → engine builds a conversation → completion client
//! answers or requests tools → tool results are folded back in.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (persona, knowledge)
    System,
    /// Tool execution result
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content. `None` on assistant messages that only request tools.
    #[serde(default)]
    pub content: Option<String>,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    /// Create an assistant message carrying tool-call requests.
    pub fn tool_request(content: Option<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Create a tool-role message from a tool result.
    pub fn tool_result(result: &ToolResult) -> Self {
        Self {
            role: Role::Tool,
            content: Some(result.payload.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: Some(result.tool_call_id.clone()),
        }
    }

    /// The text content, or an empty string.
    pub fn text_content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Unique ID for this tool call within the turn
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON-encoded string, exactly as the model sent them
    pub arguments: String,
}

/// The result of one tool dispatch, echoed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result answers
    pub tool_call_id: String,

    /// Structured result payload
    pub payload: serde_json::Value,
}

/// An ordered sequence of messages owned by a single turn.
///
/// Always starts with exactly one system message.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation with the given system instruction.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Add a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Add several messages in order.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// The messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Verify the request/result pairing invariant over the whole conversation.
    pub fn check_tool_pairing(&self) -> Result<(), String> {
        check_tool_pairing(&self.messages)
    }
}

/// Check that every tool-requesting assistant message is followed
/// immediately by one tool message per request, in request order,
/// and that no tool message appears without a matching request.
pub fn check_tool_pairing(messages: &[Message]) -> Result<(), String> {
    let mut pending: VecDeque<&str> = VecDeque::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::Tool => {
                let Some(id) = message.tool_call_id.as_deref() else {
                    return Err(format!("tool message at {index} has no tool_call_id"));
                };
                match pending.pop_front() {
                    Some(expected) if expected == id => {}
                    Some(expected) => {
                        return Err(format!(
                            "tool message at {index} answers '{id}' but '{expected}' is next"
                        ));
                    }
                    None => {
                        return Err(format!(
                            "tool message at {index} answers '{id}' with no outstanding request"
                        ));
                    }
                }
            }
            _ => {
                if let Some(expected) = pending.front() {
                    return Err(format!(
                        "message at {index} arrives before tool call '{expected}' was answered"
                    ));
                }
                if message.role == Role::Assistant && !message.tool_calls.is_empty() {
                    let mut seen = HashSet::new();
                    for call in &message.tool_calls {
                        if !seen.insert(call.id.as_str()) {
                            return Err(format!(
                                "assistant message at {index} repeats tool call id '{}'",
                                call.id
                            ));
                        }
                        pending.push_back(call.id.as_str());
                    }
                }
            }
        }
    }

    match pending.front() {
        Some(expected) => Err(format!("tool call '{expected}' was never answered")),
        None => Ok(()),
    }
}
