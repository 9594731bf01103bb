//! Record unknown question tool: logs a question the persona could not answer.

use std::sync::Arc;

use async_trait::async_trait;
use careerchat_core::error::ToolError;
use careerchat_core::notify::NotificationSink;
use careerchat_core::tool::{ParamSpec, ParamType, Tool, ToolSpec};
use serde_json::{Map, Value};
use tracing::info;

pub const NAME: &str = "record_unknown_question";

pub struct RecordUnknownQuestionTool {
    spec: ToolSpec,
    sink: Arc<dyn NotificationSink>,
}

impl RecordUnknownQuestionTool {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        let spec = ToolSpec::new(NAME, "Record an unanswered question").param(
            ParamSpec::required("question", ParamType::String)
                .describe("The question that couldn't be answered"),
        );
        Self { spec, sink }
    }
}

#[async_trait]
impl Tool for RecordUnknownQuestionTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<Value, ToolError> {
        let question = arguments
            .get("question")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments {
                tool: NAME.into(),
                reason: "missing 'question' argument".into(),
            })?;

        info!(tool = NAME, question, "Recording unknown question");
        let status = self
            .sink
            .send(&format!("Unknown question logged ➜ {question}"))
            .await;
        if !status.is_delivered() {
            info!(tool = NAME, sink = self.sink.name(), "Notification not delivered");
        }

        Ok(serde_json::json!({ "recorded": "ok" }))
    }
}
