//! Mock collaborator implementations.
//!
//! In-memory, deterministic implementations of the provider traits for tests
//! and development. The counting gateway doubles as a call recorder so tests
//! can assert a capture happened exactly once with the expected amount.

pub mod directory;
pub mod gateway;
pub mod notifier;

pub use directory::MockUserDirectory;
pub use gateway::{ChargeCall, MockPaymentGateway};
pub use notifier::{FailingNotifier, RecordingNotifier, SentPush};
