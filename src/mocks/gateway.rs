//! Mock payment gateway for development and testing.

use crate::providers::{GatewayError, GatewayReceipt, GatewayResult, PaymentGateway};
use crate::types::Money;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeCall {
    /// Amount that was requested
    pub amount: Money,
    /// Token the charge was made against
    pub token: String,
}

/// Scripted outcome for the mock gateway.
#[derive(Debug, Clone)]
enum Outcome {
    Approve,
    Decline { code: i32, message: String },
    Hang,
}

/// Mock payment gateway.
///
/// Records every call and answers with a scripted outcome: approve (default),
/// decline with a fixed code/message, or hang (for timeout tests). An
/// optional artificial delay simulates network latency.
#[derive(Clone)]
pub struct MockPaymentGateway {
    outcome: Arc<Mutex<Outcome>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<ChargeCall>>>,
    sequence: Arc<AtomicUsize>,
}

impl MockPaymentGateway {
    /// A gateway that approves every charge.
    #[must_use]
    pub fn approving() -> Self {
        Self::with_outcome(Outcome::Approve)
    }

    /// A gateway that declines every charge with the given code and message.
    #[must_use]
    pub fn declining(code: i32, message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Decline {
            code,
            message: message.into(),
        })
    }

    /// A gateway that never answers. Pair with a short capture timeout.
    #[must_use]
    pub fn hanging() -> Self {
        Self::with_outcome(Outcome::Hang)
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(outcome)),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            sequence: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Adds an artificial latency before every answer.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of charges attempted against this gateway.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn charge_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every recorded call in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn calls(&self) -> Vec<ChargeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(&self, amount: Money, _cvv: &str, token: &str) -> GatewayResult<GatewayReceipt> {
        {
            let mut calls = self.calls.lock().map_err(|_| GatewayError {
                code: 500,
                message: "mock gateway poisoned".to_string(),
            })?;
            calls.push(ChargeCall {
                amount,
                token: token.to_string(),
            });
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .outcome
            .lock()
            .map_err(|_| GatewayError {
                code: 500,
                message: "mock gateway poisoned".to_string(),
            })?
            .clone();

        match outcome {
            Outcome::Approve => {
                let n = self.sequence.fetch_add(1, Ordering::SeqCst);
                Ok(GatewayReceipt {
                    transaction_id: format!("mock_txn_{n}"),
                    amount,
                })
            }
            Outcome::Decline { code, message } => Err(GatewayError { code, message }),
            Outcome::Hang => std::future::pending().await,
        }
    }
}
