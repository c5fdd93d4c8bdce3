//! Payment capture: charging a buyer's selected instrument via the gateway.
//!
//! The capture itself is a remote call; every call carries an explicit
//! timeout so a hung gateway surfaces as a typed payment error instead of
//! blocking the admission flow. Callers commit their state transition only
//! after a successful capture.

use crate::error::{AdmissionError, Result};
use crate::providers::{PaymentGateway, UserDirectory};
use crate::types::{Money, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Gateway return code used when the call exceeded the configured timeout.
pub const TIMEOUT_CODE: i32 = -1;

/// Proof of a successful capture, handed back to the caller that commits the
/// accompanying state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureReceipt {
    /// Gateway transaction identifier
    pub transaction_id: String,
    /// Amount captured
    pub amount: Money,
    /// When the capture completed
    pub captured_at: DateTime<Utc>,
}

/// Orchestrates a charge against a user's saved payment instrument.
pub struct PaymentCapture {
    directory: Arc<dyn UserDirectory>,
    gateway: Arc<dyn PaymentGateway>,
    timeout: Duration,
}

impl PaymentCapture {
    /// Creates a capture service with the given gateway timeout.
    #[must_use]
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        gateway: Arc<dyn PaymentGateway>,
        timeout: Duration,
    ) -> Self {
        Self {
            directory,
            gateway,
            timeout,
        }
    }

    /// Charges `amount` to the user's selected instrument.
    ///
    /// No retry, no partial success: the result is either a receipt or a
    /// typed failure with the gateway's code and message verbatim.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::NoPaymentMethod`] when the user has no selected
    ///   instrument
    /// - [`AdmissionError::Payment`] when the gateway declines or the call
    ///   times out
    pub async fn charge(&self, user_id: UserId, amount: Money) -> Result<CaptureReceipt> {
        let Some(instrument) = self.directory.selected_instrument(user_id).await? else {
            return Err(AdmissionError::NoPaymentMethod);
        };

        tracing::debug!(
            user_id = %user_id,
            amount = amount.cents(),
            "Capturing payment"
        );

        let charge = self.gateway.charge(amount, &instrument.cvv, &instrument.token);
        let receipt = match tokio::time::timeout(self.timeout, charge).await {
            Err(_) => {
                tracing::warn!(
                    user_id = %user_id,
                    amount = amount.cents(),
                    timeout_secs = self.timeout.as_secs(),
                    "Gateway call timed out"
                );
                return Err(AdmissionError::Payment {
                    code: TIMEOUT_CODE,
                    message: "gateway timed out".to_string(),
                });
            }
            Ok(Err(gateway_error)) => {
                tracing::warn!(
                    user_id = %user_id,
                    code = gateway_error.code,
                    message = %gateway_error.message,
                    "Gateway declined charge"
                );
                return Err(AdmissionError::Payment {
                    code: gateway_error.code,
                    message: gateway_error.message,
                });
            }
            Ok(Ok(receipt)) => receipt,
        };

        tracing::info!(
            user_id = %user_id,
            amount = amount.cents(),
            transaction_id = %receipt.transaction_id,
            "Payment captured"
        );

        Ok(CaptureReceipt {
            transaction_id: receipt.transaction_id,
            amount: receipt.amount,
            captured_at: Utc::now(),
        })
    }
}
