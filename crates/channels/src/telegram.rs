//! Telegram notification sink.
//!
//! Posts operator notifications to the Bot API `sendMessage` method as form
//! fields `chat_id`, `text` and `parse_mode`. Delivery is best-effort: any
//! non-2xx status or transport error is logged with its status code and
//! body, reported as [`DeliveryStatus::Failed`], and never retried.

use async_trait::async_trait;
use careerchat_config::NotificationConfig;
use careerchat_core::error::NotifyError;
use careerchat_core::notify::{DeliveryStatus, NotificationSink};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Banner prepended to every notification.
pub const LOG_BANNER: &str = "🤖 **CAREER CHATBOT LOG** 🤖";

/// Telegram sink configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub bot_token: String,
    /// Chat that receives notifications.
    pub chat_id: String,
    /// Bot API base URL (overridable for tests and proxies).
    pub api_base: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl TelegramConfig {
    /// Extract Telegram settings; `None` unless both token and chat id are set.
    pub fn from_notification_config(config: &NotificationConfig) -> Option<Self> {
        Some(Self {
            bot_token: config.telegram_bot_token.clone()?,
            chat_id: config.telegram_chat_id.clone()?,
            api_base: config.telegram_api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct SendMessageForm<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Sends notifications through a Telegram bot.
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            });
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base, self.config.bot_token
        )
    }

    /// Frame a notification with the log banner.
    pub fn frame(message: &str) -> String {
        format!("{LOG_BANNER}\n\n{message}")
    }

    async fn deliver(&self, message: &str) -> Result<(), NotifyError> {
        let text = Self::frame(message);
        let form = SendMessageForm {
            chat_id: &self.config.chat_id,
            text: &text,
            parse_mode: "Markdown",
        };

        let response = self
            .client
            .post(self.endpoint())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout {
                        after_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    NotifyError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, message: &str) -> DeliveryStatus {
        match self.deliver(message).await {
            Ok(()) => {
                debug!(chat_id = %self.config.chat_id, "Telegram notification delivered");
                DeliveryStatus::Delivered
            }
            Err(NotifyError::Rejected { status, body }) => {
                warn!(status, body = %body, "Telegram notification rejected");
                DeliveryStatus::Failed(NotifyError::Rejected { status, body })
            }
            Err(e) => {
                warn!(error = %e, "Telegram notification failed");
                DeliveryStatus::Failed(e)
            }
        }
    }
}
