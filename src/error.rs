//! Error types for inventory and admission operations.

use crate::types::{ApprovalStatus, EventId, GuestId, TicketId};
use thiserror::Error;

/// Result type alias for admission operations.
pub type Result<T> = std::result::Result<T, AdmissionError>;

/// Error taxonomy for the admission lifecycle engine.
///
/// Every failure an operation can produce is typed here and recovered at the
/// service boundary; none are fatal. The caller-facing layer maps each variant
/// to a client response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    // ═══════════════════════════════════════════════════════════
    // Input Validation
    // ═══════════════════════════════════════════════════════════

    /// Malformed input (non-positive count, missing mandatory tier, ...).
    #[error("Invalid request: {reason}")]
    Validation {
        /// What was wrong with the input
        reason: String,
    },

    /// Buyer does not meet the event's admission requirements.
    #[error("Buyer is not eligible: {reason}")]
    Eligibility {
        /// Which requirement failed
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Inventory Rejections
    // ═══════════════════════════════════════════════════════════

    /// No stock remains in any tier.
    #[error("Ticket is sold out")]
    SoldOut,

    /// The active tier cannot serve the whole request (requests never split
    /// across tiers).
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units requested
        requested: u32,
        /// Units remaining in the active tier
        available: u32,
    },

    /// A booking was requested on a ticket that does not allow reservations.
    #[error("This ticket cannot be booked")]
    BookingNotAllowed,

    // ═══════════════════════════════════════════════════════════
    // Lookup Failures
    // ═══════════════════════════════════════════════════════════

    /// Unknown ticket id.
    #[error("Ticket {id} not found")]
    TicketNotFound {
        /// The id that was looked up
        id: TicketId,
    },

    /// Unknown guest id.
    #[error("Guest {id} not found")]
    GuestNotFound {
        /// The id that was looked up
        id: GuestId,
    },

    /// Unknown event id.
    #[error("Event {id} not found")]
    EventNotFound {
        /// The id that was looked up
        id: EventId,
    },

    // ═══════════════════════════════════════════════════════════
    // Authorization
    // ═══════════════════════════════════════════════════════════

    /// Actor is neither the event owner nor holds the required delegated
    /// permission.
    #[error("Forbidden: requires ownership or the {required} permission")]
    Forbidden {
        /// The permission the operation requires
        required: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Lifecycle Violations
    // ═══════════════════════════════════════════════════════════

    /// Check-in attempted on an already consumed ticket.
    #[error("Ticket has already been used")]
    AlreadyUsed,

    /// Approval status change outside the defined state machine.
    #[error("Cannot change guest status from {from} to {to}")]
    InvalidTransition {
        /// Status the guest is in
        from: ApprovalStatus,
        /// Status that was requested
        to: ApprovalStatus,
    },

    // ═══════════════════════════════════════════════════════════
    // Payment
    // ═══════════════════════════════════════════════════════════

    /// The buyer has no saved payment instrument, or none is selected.
    #[error("No payment method on file")]
    NoPaymentMethod,

    /// The gateway declined the charge, timed out, or rejected the
    /// instrument. Code and message are taken verbatim from the gateway.
    #[error("Payment failed ({code}): {message}")]
    Payment {
        /// Gateway return code
        code: i32,
        /// Gateway return message
        message: String,
    },

    // ═══════════════════════════════════════════════════════════
    // System
    // ═══════════════════════════════════════════════════════════

    /// Storage or synchronization failure.
    #[error("Internal error")]
    Internal,
}
