//! Collaborator interfaces.
//!
//! This module defines traits for the external dependencies the engine calls
//! out to: the payment gateway, the eligibility policy, the push-notification
//! sender, and the user directory. Providers are **interfaces**, not
//! implementations: the services depend on these traits, and the hosting
//! application supplies concrete implementations.
//!
//! This enables:
//! - **Testing**: mocks run in-memory and deterministically (see [`crate::mocks`])
//! - **Production**: real services (payment processor, Firebase, user service)
//! - **Development**: instrumented versions (logging, tracing)

pub mod directory;
pub mod eligibility;
pub mod gateway;
pub mod notifier;

pub use directory::UserDirectory;
pub use eligibility::{EligibilityPolicy, ProfileEligibility};
pub use gateway::{GatewayError, GatewayReceipt, GatewayResult, PaymentGateway};
pub use notifier::NotificationSender;
