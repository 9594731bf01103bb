//! Notification sinks and chat channels for careerchat.
//!
//! Sinks report events to the operator; channels carry user messages in.
//!
//! Available:
//! - **Telegram**: `sendMessage` webhook notification sink
//! - **Log**: tracing-only sink used when Telegram is not configured
//! - **CLI**: interactive terminal input (stdin)

pub mod cli;
pub mod log;
pub mod telegram;

use careerchat_config::NotificationConfig;
use careerchat_core::notify::NotificationSink;
use std::sync::Arc;

pub use cli::CliChannel;
pub use log::LogNotifier;
pub use telegram::{TelegramConfig, TelegramNotifier};

/// Pick the notification sink the configuration asks for.
///
/// Falls back to [`LogNotifier`] when Telegram credentials are incomplete.
pub fn sink_from_config(config: &NotificationConfig) -> Arc<dyn NotificationSink> {
    match TelegramConfig::from_notification_config(config) {
        Some(telegram) => Arc::new(TelegramNotifier::new(telegram)),
        None => {
            tracing::warn!("Telegram credentials not set, notifications go to the log only");
            Arc::new(LogNotifier)
        }
    }
}
