//! # Admissions — Ticket Inventory & Admission Lifecycle Engine
//!
//! Sells tiered-priced admission tickets and tracks each buyer's admission
//! and payment state through to check-in:
//!
//! - **`TicketInventory`** allocates finite, price-tiered stock atomically
//!   and advances the active price as tiers deplete
//! - **`AdmissionLedger`** records each purchase as a guest with a locked-in
//!   historical price and drives it through approval, payment, and check-in
//! - **`PaymentCapture`** charges the buyer's saved instrument via an
//!   external gateway, under an explicit timeout
//! - **`PermissionGuard`** resolves owner-or-delegated authorization for
//!   privileged operations
//!
//! # Architecture
//!
//! ```text
//!                 purchase request
//!                        │
//!                        ▼
//!              ┌──────────────────┐   eligibility   ┌──────────────────┐
//!              │  AdmissionLedger │ ──────────────▶ │ EligibilityPolicy │
//!              │  (guest records) │                 └──────────────────┘
//!              └───────┬──────────┘
//!          allocate    │      charge
//!        ┌─────────────┴─────────────┐
//!        ▼                           ▼
//! ┌────────────────┐        ┌────────────────┐      ┌──────────────┐
//! │ TicketInventory │        │ PaymentCapture │ ───▶ │   Gateway    │
//! │ (tier counters) │        │  (timeout'd)   │      │  (external)  │
//! └────────────────┘        └────────────────┘      └──────────────┘
//! ```
//!
//! Approve/deny and check-in consult [`permissions::PermissionGuard`];
//! committed approval changes notify the guest's device, fire-and-forget.
//!
//! # Design rules
//!
//! - Tier counters are the only stored stock; aggregate count and active
//!   price are derived reads, so they cannot drift
//! - Allocation per ticket and decisions per guest are serialized;
//!   concurrent buyers never oversell and a guest is never charged twice
//! - Side-effecting charges run first; state commits only on charge success
//! - Every failure is a typed [`error::AdmissionError`]; nothing is fatal

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod capture;
pub mod config;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod mocks;
pub mod permissions;
pub mod providers;
pub mod stores;
pub mod types;

pub use capture::{CaptureReceipt, PaymentCapture};
pub use config::Config;
pub use error::{AdmissionError, Result};
pub use inventory::TicketInventory;
pub use ledger::AdmissionLedger;
pub use permissions::PermissionGuard;
pub use types::{
    Allocation, ApprovalStatus, Guest, GuestId, Money, PaymentStatus, Permission, Tier, Ticket,
    TicketId, TicketSpec, TierSpec,
};
