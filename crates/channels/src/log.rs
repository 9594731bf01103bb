//! Log-only notification sink.

use async_trait::async_trait;
use careerchat_core::notify::{DeliveryStatus, NotificationSink};
use tracing::info;

/// Writes notifications to the tracing log instead of a remote channel.
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &str) -> DeliveryStatus {
        info!(notification = %message, "Notification");
        DeliveryStatus::Delivered
    }
}
