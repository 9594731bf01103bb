//! Record user details tool: captures a visitor's contact information.
//!
//! Forwards the email (plus optional name and notes) to the operator's
//! notification sink. A failed notification does not fail the tool; the
//! model always sees `{"recorded": "ok"}`.

use std::sync::Arc;

use async_trait::async_trait;
use careerchat_core::error::ToolError;
use careerchat_core::notify::NotificationSink;
use careerchat_core::tool::{ParamSpec, ParamType, Tool, ToolSpec};
use serde_json::{Map, Value};
use tracing::info;

pub const NAME: &str = "record_user_details";
pub const DEFAULT_NAME: &str = "Name not provided";
pub const DEFAULT_NOTES: &str = "not provided";

pub struct RecordUserDetailsTool {
    spec: ToolSpec,
    sink: Arc<dyn NotificationSink>,
}

impl RecordUserDetailsTool {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        let spec = ToolSpec::new(NAME, "Record when a user provides an email")
            .param(
                ParamSpec::required("email", ParamType::String)
                    .describe("The email address of this user"),
            )
            .param(
                ParamSpec::optional("name", ParamType::String)
                    .describe("The user's name, if they provided it"),
            )
            .param(
                ParamSpec::optional("notes", ParamType::String).describe(
                    "Any additional information about the conversation that's worth recording to give context",
                ),
            );
        Self { spec, sink }
    }
}

fn text_or<'a>(arguments: &'a Map<String, Value>, key: &str, default: &'a str) -> &'a str {
    arguments.get(key).and_then(Value::as_str).unwrap_or(default)
}

#[async_trait]
impl Tool for RecordUserDetailsTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<Value, ToolError> {
        let email = arguments
            .get("email")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments {
                tool: NAME.into(),
                reason: "missing 'email' argument".into(),
            })?;
        let name = text_or(&arguments, "name", DEFAULT_NAME);
        let notes = text_or(&arguments, "notes", DEFAULT_NOTES);

        info!(tool = NAME, email, "Recording user details");
        let status = self
            .sink
            .send(&format!("New visitor ➜ {name}, Email: {email}, Notes: {notes}"))
            .await;
        if !status.is_delivered() {
            info!(tool = NAME, sink = self.sink.name(), "Notification not delivered");
        }

        Ok(serde_json::json!({ "recorded": "ok" }))
    }
}
