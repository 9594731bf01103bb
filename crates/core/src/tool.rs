//! Tool trait: the abstraction over the assistant's side-effecting capabilities.
//!
//! A tool declares a [`ToolSpec`] (name, description, typed parameters) and
//! an async handler. Tools are registered once at startup in a
//! [`ToolRegistry`], which validates model-supplied arguments against the
//! spec before any handler runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;
use crate::completion::ToolDefinition;
use crate::error::ToolError;
use crate::message::{ToolCallRequest, ToolResult};

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    /// The JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            description: None,
        }
    }

    pub fn optional(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The immutable contract of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamSpec>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Add a parameter (builder style).
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.parameters.push(param);
        self
    }

    /// Render the parameters as a JSON Schema object.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            let mut prop = serde_json::json!({ "type": param.kind.as_str() });
            if let Some(description) = &param.description {
                prop["description"] = Value::String(description.clone());
            }
            properties.insert(param.name.clone(), prop);
        }

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Convert this spec into a ToolDefinition for sending to the model.
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.json_schema(),
        }
    }

    /// Parse and validate a raw JSON arguments string against this spec.
    ///
    /// Returns only declared parameters; explicit `null` on an optional
    /// parameter is treated as absent. Undeclared keys are dropped.
    pub fn validate(&self, raw: &str) -> Result<Map<String, Value>, ToolError> {
        let invalid = |reason: String| ToolError::InvalidArguments {
            tool: self.name.clone(),
            reason,
        };

        let parsed: Value = if raw.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(raw).map_err(|e| invalid(format!("not valid JSON: {e}")))?
        };

        let Value::Object(mut object) = parsed else {
            return Err(invalid("arguments must be a JSON object".into()));
        };

        let mut validated = Map::new();
        for param in &self.parameters {
            match object.remove(&param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(invalid(format!("missing required field '{}'", param.name)));
                }
                None | Some(Value::Null) => {}
                Some(value) if !param.kind.accepts(&value) => {
                    return Err(invalid(format!(
                        "field '{}' must be of type {}",
                        param.name,
                        param.kind.as_str()
                    )));
                }
                Some(value) => {
                    validated.insert(param.name.clone(), value);
                }
            }
        }

        if !object.is_empty() {
            let extra: Vec<&String> = object.keys().collect();
            debug!(tool = %self.name, ?extra, "Ignoring undeclared tool arguments");
        }

        Ok(validated)
    }
}

/// The core Tool trait.
///
/// Handlers receive arguments that already passed [`ToolSpec::validate`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The contract sent to the model and used for validation.
    fn spec(&self) -> &ToolSpec;

    /// Execute the tool with validated arguments.
    async fn execute(&self, arguments: Map<String, Value>) -> Result<Value, ToolError>;

    /// The unique name of this tool.
    fn name(&self) -> &str {
        &self.spec().name
    }
}

/// A registry of available tools, in registration order.
///
/// Built once at startup and shared read-only across turns.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&slot| self.tools[slot].as_ref())
    }

    /// All registered specs, in registration order.
    pub fn specs(&self) -> Vec<&ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    /// Get all tool definitions (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.specs().into_iter().map(ToolSpec::to_definition).collect()
    }

    /// Validate `arguments` against the named tool's spec and run it.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let validated = tool.spec().validate(arguments)?;
        tool.execute(validated).await
    }

    /// Dispatch a model tool call, producing its result.
    pub async fn execute(&self, call: &ToolCallRequest) -> Result<ToolResult, ToolError> {
        let payload = self.dispatch(&call.name, &call.arguments).await?;
        Ok(ToolResult {
            tool_call_id: call.id.clone(),
            payload,
        })
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool {
        spec: ToolSpec,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new("echo", "Echoes back the input")
                    .param(ParamSpec::required("text", ParamType::String))
                    .param(ParamSpec::optional("times", ParamType::Integer)),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, arguments: Map<String, Value>) -> Result<Value, ToolError> {
            let times = arguments.get("times").and_then(Value::as_u64).unwrap_or(1);
            let text = arguments["text"].as_str().unwrap_or_default();
            Ok(serde_json::json!({ "echo": text.repeat(times as usize) }))
        }
    }

    struct NamedTool(ToolSpec);

    #[async_trait]
    impl Tool for NamedTool {
        fn spec(&self) -> &ToolSpec {
            &self.0
        }

        async fn execute(&self, _arguments: Map<String, Value>) -> Result<Value, ToolError> {
            Ok(Value::String(self.0.description.clone()))
        }
    }

    #[test]
    fn schema_lists_required_fields() {
        let schema = EchoTool::new().spec.json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["text"]["type"], "string");
        assert_eq!(schema["properties"]["times"]["type"], "integer");
        assert_eq!(schema["required"], serde_json::json!(["text"]));
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::new()));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_keeps_registration_order_and_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NamedTool(ToolSpec::new("b", "first b"))));
        registry.register(Box::new(NamedTool(ToolSpec::new("a", "a"))));
        registry.register(Box::new(NamedTool(ToolSpec::new("b", "second b"))));

        assert_eq!(registry.names(), vec!["b", "a"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.definitions()[0].description, "second b");
    }

    #[tokio::test]
    async fn dispatch_runs_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::new()));
        let out = registry
            .dispatch("echo", r#"{"text":"ab","times":2}"#)
            .await
            .unwrap();
        assert_eq!(out["echo"], "abab");
    }

    #[tokio::test]
    async fn dispatch_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.dispatch("delete_everything", "{}").await.unwrap_err();
        assert_eq!(err, ToolError::UnknownTool("delete_everything".into()));
    }

    #[tokio::test]
    async fn dispatch_rejects_missing_required() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::new()));
        let err = registry.dispatch("echo", r#"{"times":2}"#).await.unwrap_err();
        assert!(
            matches!(err, ToolError::InvalidArguments { ref reason, .. } if reason.contains("text"))
        );
    }

    #[tokio::test]
    async fn dispatch_rejects_wrong_type_and_bad_json() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::new()));

        let wrong = registry.dispatch("echo", r#"{"text":5}"#).await.unwrap_err();
        assert!(matches!(wrong, ToolError::InvalidArguments { .. }));

        let bad_json = registry.dispatch("echo", r#"{"text":"#).await.unwrap_err();
        assert!(matches!(bad_json, ToolError::InvalidArguments { .. }));

        let not_object = registry.dispatch("echo", r#"["text"]"#).await.unwrap_err();
        assert!(matches!(not_object, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn validate_drops_nulls_and_undeclared_keys() {
        let spec = EchoTool::new().spec;
        let args = spec
            .validate(r#"{"text":"hi","times":null,"mood":"happy"}"#)
            .unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args["text"], "hi");
    }

    #[tokio::test]
    async fn execute_echoes_call_id() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool::new()));
        let call = ToolCallRequest {
            id: "call_7".into(),
            name: "echo".into(),
            arguments: r#"{"text":"x"}"#.into(),
        };
        let result = registry.execute(&call).await.unwrap();
        assert_eq!(result.tool_call_id, "call_7");
        assert_eq!(result.payload["echo"], "x");
    }
}
