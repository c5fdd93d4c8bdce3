//! Payment gateway trait.
//!
//! Abstraction over the external card processor. The gateway is handed the
//! amount plus the stored instrument's CVV and opaque token, and answers with
//! either a receipt or a coded error that is surfaced to callers verbatim.

use crate::types::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payment gateway result
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// An error reported by the gateway.
///
/// Code and message come straight from the gateway response; the engine does
/// not reinterpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayError {
    /// Gateway return code
    pub code: i32,
    /// Gateway return message
    pub message: String,
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gateway error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

/// A successful gateway charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayReceipt {
    /// Gateway transaction identifier
    pub transaction_id: String,
    /// Amount charged
    pub amount: Money,
}

/// Payment gateway.
///
/// A call is a remote HTTP round-trip; [`crate::capture::PaymentCapture`]
/// wraps every call in an explicit timeout.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge a stored card.
    ///
    /// # Errors
    ///
    /// Returns the gateway's own error code and message when the charge is
    /// declined or the instrument is rejected.
    async fn charge(&self, amount: Money, cvv: &str, token: &str) -> GatewayResult<GatewayReceipt>;
}
