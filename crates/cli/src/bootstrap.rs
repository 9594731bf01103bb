//! Startup wiring shared by `chat` and `serve`.
//!
//! Builds the process-wide pieces once: notification sink, knowledge
//! context, tool registry, completion client and dialogue engine.

use std::sync::Arc;
use std::time::Duration;

use careerchat_agent::DialogueEngine;
use careerchat_channels::sink_from_config;
use careerchat_config::AppConfig;
use careerchat_core::completion::CompletionClient;
use careerchat_core::notify::{DeliveryStatus, NotificationSink};
use careerchat_knowledge::KnowledgeLoader;
use careerchat_providers::OpenAiCompatClient;
use tracing::{info, warn};

/// Everything a surface needs to serve turns.
pub struct Runtime {
    pub engine: Arc<DialogueEngine>,
    pub sink: Arc<dyn NotificationSink>,
    pub tool_names: Vec<String>,
    pub knowledge_tokens: usize,
}

/// Wire the runtime from `config`, using `client` for completions.
pub fn build_with_client(config: &AppConfig, client: Arc<dyn CompletionClient>) -> Runtime {
    let sink = sink_from_config(&config.notifications);
    let knowledge = Arc::new(KnowledgeLoader::load(&config.knowledge));
    let tools = Arc::new(careerchat_tools::default_registry(sink.clone()));
    let tool_names = tools.names().into_iter().map(String::from).collect();
    let knowledge_tokens = knowledge.estimated_tokens();

    let engine = DialogueEngine::from_config(config, client, tools, knowledge);

    info!(
        persona = %config.persona.name,
        provider = %config.provider.name,
        model = %config.provider.model,
        sink = sink.name(),
        knowledge_tokens,
        "Runtime ready"
    );

    Runtime {
        engine: Arc::new(engine),
        sink,
        tool_names,
        knowledge_tokens,
    }
}

/// Wire the runtime from `config` with the configured provider.
pub fn build(config: &AppConfig) -> Runtime {
    let timeout = Duration::from_secs(config.agent.completion_timeout_secs);
    let client = Arc::new(OpenAiCompatClient::from_config(&config.provider, timeout));
    build_with_client(config, client)
}

/// Send the one-per-process "service is live" notification if enabled.
pub async fn announce_startup(
    config: &AppConfig,
    sink: &dyn NotificationSink,
) -> Option<DeliveryStatus> {
    if !config.notifications.announce_startup {
        return None;
    }
    let chat_id = config
        .notifications
        .telegram_chat_id
        .as_deref()
        .unwrap_or("not configured");
    let status = sink.send(&format!("Bot starting up! Chat ID: {chat_id}")).await;
    if !status.is_delivered() {
        warn!(sink = sink.name(), "Startup announcement not delivered");
    }
    Some(status)
}
