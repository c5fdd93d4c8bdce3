//! Push notification sender trait.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Sends a push notification to a device token.
///
/// Delivery is fire-and-forget from the engine's point of view: a committed
/// state change is never rolled back because a notification failed. Failures
/// are logged by the caller and otherwise ignored.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send one push message.
    ///
    /// # Errors
    ///
    /// Returns an error when the delivery service rejects the message; the
    /// caller logs and drops it.
    async fn push(&self, token: &str, title: &str, body: &str, metadata: Value) -> Result<()>;
}
