//! NotificationSink trait: best-effort outbound reports to an operator.
//!
//! Sinks never return an error to their caller. A failed delivery is
//! logged by the sink and reported as [`DeliveryStatus::Failed`], which
//! callers are free to ignore.

use async_trait::async_trait;
use crate::error::NotifyError;

/// Outcome of a single notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Failed(NotifyError),
}

impl DeliveryStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered)
    }
}

/// A fire-and-forget notification channel.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// A human-readable name for this sink (e.g., "telegram").
    fn name(&self) -> &str;

    /// Send one message. Must not panic or block indefinitely.
    async fn send(&self, message: &str) -> DeliveryStatus;
}
