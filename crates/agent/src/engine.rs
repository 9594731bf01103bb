//! The dialogue loop implementation.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use careerchat_config::AppConfig;
use careerchat_core::completion::{Completion, CompletionClient, CompletionRequest};
use careerchat_core::error::{CompletionError, Error, Result};
use careerchat_core::knowledge::KnowledgeContext;
use careerchat_core::message::{Conversation, Message, Role, check_tool_pairing};
use careerchat_core::tool::ToolRegistry;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::prompt::PromptBuilder;

/// Default cap on model calls per turn.
pub const DEFAULT_MAX_TOOL_ITERATIONS: u32 = 8;

/// Default bound on a single completion call.
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// Orchestrates completion calls and tool dispatch for one user turn at a time.
///
/// The engine holds only shared read-only state, so one instance serves
/// concurrent turns; each turn owns its own [`Conversation`].
pub struct DialogueEngine {
    /// The completion provider
    client: Arc<dyn CompletionClient>,

    /// Tool registry, read-only after startup
    tools: Arc<ToolRegistry>,

    /// Name the model speaks as
    persona: String,

    /// Background text for the system prompt
    knowledge: Arc<KnowledgeContext>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Max tokens per response
    max_tokens: Option<u32>,

    /// Maximum completion calls per turn
    max_iterations: u32,

    /// Bound on each completion call
    completion_timeout: Duration,
}

impl DialogueEngine {
    /// Create a new engine with default limits.
    pub fn new(
        client: Arc<dyn CompletionClient>,
        tools: Arc<ToolRegistry>,
        persona: impl Into<String>,
        knowledge: Arc<KnowledgeContext>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            tools,
            persona: persona.into(),
            knowledge,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            max_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    /// Create an engine with persona, model and limits taken from `config`.
    pub fn from_config(
        config: &AppConfig,
        client: Arc<dyn CompletionClient>,
        tools: Arc<ToolRegistry>,
        knowledge: Arc<KnowledgeContext>,
    ) -> Self {
        let engine = Self::new(
            client,
            tools,
            config.persona.name.clone(),
            knowledge,
            config.provider.model.clone(),
        )
        .with_temperature(config.provider.temperature)
        .with_max_iterations(config.agent.max_tool_iterations)
        .with_completion_timeout(Duration::from_secs(config.agent.completion_timeout_secs));

        match config.provider.max_tokens {
            Some(max) => engine.with_max_tokens(max),
            None => engine,
        }
    }

    /// Set the maximum number of completion calls per turn (at least 1).
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Set the timeout applied to each completion call.
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The system prompt every turn starts with.
    pub fn system_prompt(&self) -> String {
        PromptBuilder::build(&self.persona, &self.knowledge)
    }

    /// Answer `user_message` given the prior `history`.
    ///
    /// Builds `[system] + history + [user]`, then alternates completion
    /// calls and tool dispatch until the model gives a final message.
    /// Unknown tools and invalid arguments abort the turn. A turn that is
    /// still requesting tools after `max_iterations` completion calls fails
    /// with [`Error::ToolLoopExceeded`].
    pub async fn respond(&self, user_message: &str, history: &[Message]) -> Result<String> {
        validate_history(history)?;

        let turn_id = Uuid::new_v4();
        let mut conversation = Conversation::new(self.system_prompt());
        conversation.extend(history.iter().cloned());
        conversation.push(Message::user(user_message));

        info!(
            turn_id = %turn_id,
            history = history.len(),
            "Processing turn"
        );

        let tool_definitions = self.tools.definitions();
        let mut issued_ids: HashSet<String> = HashSet::new();

        for iteration in 1..=self.max_iterations {
            // Every request must carry one result per outstanding tool call.
            conversation.check_tool_pairing().map_err(Error::Internal)?;

            debug!(turn_id = %turn_id, iteration, "Dialogue loop iteration");

            let request = CompletionRequest {
                model: self.model.clone(),
                messages: conversation.messages().to_vec(),
                tools: tool_definitions.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let started = Instant::now();
            let response =
                tokio::time::timeout(self.completion_timeout, self.client.complete(request))
                    .await
                    .map_err(|_| CompletionError::Timeout {
                        after_secs: self.completion_timeout.as_secs(),
                    })??;

            debug!(
                turn_id = %turn_id,
                iteration,
                client = self.client.name(),
                model = %response.model,
                duration_ms = started.elapsed().as_millis() as u64,
                "Completion received"
            );
            if let Some(usage) = &response.usage {
                debug!(
                    turn_id = %turn_id,
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    total_tokens = usage.total_tokens,
                    "Token usage"
                );
            }

            let (content, calls) = match response.completion {
                Completion::FinalMessage(text) => {
                    info!(turn_id = %turn_id, iterations = iteration, "Turn complete");
                    return Ok(text);
                }
                Completion::ToolRequest { content, calls } => (content, calls),
            };

            if calls.is_empty() {
                return Err(CompletionError::MalformedResponse(
                    "tool request without tool calls".into(),
                )
                .into());
            }
            // Ids pair results with calls, so none may repeat within the turn.
            for call in &calls {
                if !issued_ids.insert(call.id.clone()) {
                    warn!(turn_id = %turn_id, call_id = %call.id, "Model repeated a tool call id");
                    return Err(CompletionError::MalformedResponse(format!(
                        "tool call id '{}' repeated within the turn",
                        call.id
                    ))
                    .into());
                }
            }

            debug!(turn_id = %turn_id, tool_count = calls.len(), "Executing tool calls");
            conversation.push(Message::tool_request(content, calls.clone()));

            for call in &calls {
                info!(turn_id = %turn_id, tool = %call.name, call_id = %call.id, "Tool called");

                let started = Instant::now();
                let result = self.tools.execute(call).await;
                let duration_ms = started.elapsed().as_millis() as u64;

                match result {
                    Ok(tool_result) => {
                        debug!(tool = %call.name, duration_ms, "Tool finished");
                        conversation.push(Message::tool_result(&tool_result));
                    }
                    Err(e) => {
                        warn!(
                            turn_id = %turn_id,
                            tool = %call.name,
                            duration_ms,
                            error = %e,
                            "Tool dispatch failed, aborting turn"
                        );
                        return Err(e.into());
                    }
                }
            }
        }

        warn!(
            turn_id = %turn_id,
            limit = self.max_iterations,
            "Tool loop exceeded iteration cap"
        );
        Err(Error::ToolLoopExceeded {
            limit: self.max_iterations,
        })
    }
}

/// Caller history may not carry its own system message and must keep
/// every tool call paired with its result.
fn validate_history(history: &[Message]) -> Result<()> {
    if let Some(index) = history.iter().position(|m| m.role == Role::System) {
        return Err(Error::InvalidHistory(format!(
            "system message at {index}; the engine supplies its own"
        )));
    }
    check_tool_pairing(history).map_err(Error::InvalidHistory)
}
