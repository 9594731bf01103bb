//! Configuration loading, validation, and management for careerchat.
//!
//! Loads configuration from `careerchat.toml` (or an explicit path) with
//! environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "careerchat.toml";

/// The root configuration structure.
///
/// Maps directly to `careerchat.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Who the assistant speaks as
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Chat-completion provider
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Dialogue loop limits
    #[serde(default)]
    pub agent: AgentConfig,

    /// Knowledge source locations
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Operator notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_persona_name")]
    pub name: String,
}

fn default_persona_name() -> String {
    "A.S Harsha".into()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Label used in logs (e.g., "ollama", "openai")
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// OpenAI-compatible base URL (without `/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_provider_name() -> String {
    "ollama".into()
}
fn default_base_url() -> String {
    "http://localhost:11434/v1".into()
}
fn default_model() -> String {
    "llama3.2".into()
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum model calls per turn before giving up
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: u32,

    /// Timeout for each model call
    #[serde(default = "default_completion_timeout")]
    pub completion_timeout_secs: u64,
}

fn default_max_tool_iterations() -> u32 {
    8
}
fn default_completion_timeout() -> u64 {
    120
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_iterations: default_max_tool_iterations(),
            completion_timeout_secs: default_completion_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Profile document (PDF)
    #[serde(default = "default_profile_pdf")]
    pub profile_pdf: PathBuf,

    /// Professional summary (plain text)
    #[serde(default = "default_summary")]
    pub summary: PathBuf,
}

fn default_profile_pdf() -> PathBuf {
    PathBuf::from("me/profile.pdf")
}
fn default_summary() -> PathBuf {
    PathBuf::from("me/summary.txt")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            profile_pdf: default_profile_pdf(),
            summary: default_summary(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_bot_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<String>,

    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,

    /// Timeout for each notification call
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,

    /// Send a notification once when the process starts
    #[serde(default = "default_true")]
    pub announce_startup: bool,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".into()
}
fn default_notify_timeout() -> u64 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_base: default_telegram_api_base(),
            timeout_secs: default_notify_timeout(),
            announce_startup: true,
        }
    }
}

impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("telegram_bot_token", &redact(&self.telegram_bot_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("telegram_api_base", &self.telegram_api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("announce_startup", &self.announce_startup)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    7860
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or `careerchat.toml` in the working
    /// directory, then apply environment overrides:
    /// - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`
    /// - `CAREERCHAT_API_KEY` (then `OPENAI_API_KEY`)
    /// - `CAREERCHAT_MODEL`, `CAREERCHAT_BASE_URL`, `CAREERCHAT_PERSONA`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::read_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            self.notifications.telegram_bot_token = Some(token);
        }
        if let Some(chat_id) = lookup("TELEGRAM_CHAT_ID") {
            self.notifications.telegram_chat_id = Some(chat_id);
        }
        if self.provider.api_key.is_none() {
            self.provider.api_key =
                lookup("CAREERCHAT_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
        if let Some(model) = lookup("CAREERCHAT_MODEL") {
            self.provider.model = model;
        }
        if let Some(base_url) = lookup("CAREERCHAT_BASE_URL") {
            self.provider.base_url = base_url;
        }
        if let Some(persona) = lookup("CAREERCHAT_PERSONA") {
            self.persona.name = persona;
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.temperature < 0.0 || self.provider.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_tool_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_tool_iterations must be at least 1".into(),
            ));
        }

        if self.agent.completion_timeout_secs == 0 || self.notifications.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        if self.persona.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "persona.name must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.provider.name, "ollama");
        assert_eq!(config.provider.model, "llama3.2");
        assert_eq!(config.agent.max_tool_iterations, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider.base_url, config.provider.base_url);
        assert_eq!(parsed.gateway.port, config.gateway.port);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.provider.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iteration_cap_rejected() {
        let mut config = AppConfig::default();
        config.agent.max_tool_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/careerchat.toml")).unwrap();
        assert_eq!(config.provider.name, "ollama");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("careerchat.toml");
        std::fs::write(
            &path,
            r#"
[persona]
name = "Ada Lovelace"

[agent]
max_tool_iterations = 3

[notifications]
telegram_chat_id = "42"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.persona.name, "Ada Lovelace");
        assert_eq!(config.agent.max_tool_iterations, 3);
        assert_eq!(config.agent.completion_timeout_secs, 120);
        assert_eq!(config.notifications.telegram_chat_id.as_deref(), Some("42"));
        assert!(config.notifications.telegram_bot_token.is_none());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("careerchat.toml");
        std::fs::write(&path, "[agent\nmax_tool_iterations = ").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "999"),
            ("OPENAI_API_KEY", "sk-test"),
            ("CAREERCHAT_MODEL", "gpt-4o-mini"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.notifications.telegram_bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.notifications.telegram_chat_id.as_deref(), Some("999"));
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("sk-secret".into());
        config.notifications.telegram_bot_token = Some("123:secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("123:secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("llama3.2"));
        assert!(toml_str.contains("max_tool_iterations"));
    }
}
