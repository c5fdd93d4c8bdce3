//! Mock notification senders.

use crate::error::{AdmissionError, Result};
use crate::providers::NotificationSender;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One recorded push message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPush {
    /// Device token the push was addressed to
    pub token: String,
    /// Message title
    pub title: String,
    /// Message body
    pub body: String,
    /// Structured payload
    pub metadata: Value,
}

/// Notification sender that records every push.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentPush>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every push recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn sent(&self) -> Vec<SentPush> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn push(&self, token: &str, title: &str, body: &str, metadata: Value) -> Result<()> {
        self.sent
            .lock()
            .map_err(|_| AdmissionError::Internal)?
            .push(SentPush {
                token: token.to_string(),
                title: title.to_string(),
                body: body.to_string(),
                metadata,
            });
        Ok(())
    }
}

/// Notification sender that always fails, for verifying that delivery
/// failures never abort a committed state change.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingNotifier;

#[async_trait]
impl NotificationSender for FailingNotifier {
    async fn push(&self, _token: &str, _title: &str, _body: &str, _metadata: Value) -> Result<()> {
        Err(AdmissionError::Internal)
    }
}
