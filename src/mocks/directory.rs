//! Mock user directory.

use crate::error::{AdmissionError, Result};
use crate::providers::UserDirectory;
use crate::types::{PaymentInstrument, UserId, UserProfile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory user directory.
///
/// Holds profiles and saved instruments per user. Mirrors the collaborator's
/// contract: at most one instrument per user is flagged selected.
#[derive(Debug, Clone, Default)]
pub struct MockUserDirectory {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
    instruments: Arc<Mutex<HashMap<UserId, Vec<PaymentInstrument>>>>,
}

impl MockUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a profile.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    #[allow(clippy::unwrap_used)]
    pub fn add_profile(&self, profile: UserProfile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    /// Saves an instrument for a user.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    #[allow(clippy::unwrap_used)]
    pub fn add_instrument(&self, user_id: UserId, instrument: PaymentInstrument) {
        self.instruments
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(instrument);
    }

    /// Saves a selected test card for a user, in one call.
    pub fn select_card(&self, user_id: UserId, token: impl Into<String>) {
        self.add_instrument(
            user_id,
            PaymentInstrument {
                token: token.into(),
                cvv: "123".to_string(),
                card_holder: "TEST HOLDER".to_string(),
                display_number: "**** **** **** 4242".to_string(),
                is_selected: true,
            },
        );
    }

    /// Builder form of [`select_card`](Self::select_card).
    #[must_use]
    pub fn with_selected_card(self, user_id: UserId, token: impl Into<String>) -> Self {
        self.select_card(user_id, token);
        self
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn selected_instrument(&self, user_id: UserId) -> Result<Option<PaymentInstrument>> {
        Ok(self
            .instruments
            .lock()
            .map_err(|_| AdmissionError::Internal)?
            .get(&user_id)
            .and_then(|instruments| instruments.iter().find(|card| card.is_selected))
            .cloned())
    }

    async fn profile(&self, user_id: UserId) -> Result<Option<UserProfile>> {
        Ok(self
            .profiles
            .lock()
            .map_err(|_| AdmissionError::Internal)?
            .get(&user_id)
            .cloned())
    }
}
