//! User directory trait.

use crate::error::Result;
use crate::types::{PaymentInstrument, UserId, UserProfile};
use async_trait::async_trait;

/// Read access to the user-management collaborator.
///
/// The directory owns profiles and saved payment instruments; this engine
/// only reads them. Instrument selection (exactly zero or one selected) is
/// enforced on the directory's side.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The payment instrument flagged selected for a user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory lookup fails.
    async fn selected_instrument(&self, user_id: UserId) -> Result<Option<PaymentInstrument>>;

    /// A user's profile, if the user exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory lookup fails.
    async fn profile(&self, user_id: UserId) -> Result<Option<UserProfile>>;
}
