//! Eligibility policy trait and the standard profile-based implementation.

use crate::error::{AdmissionError, Result};
use crate::types::{EventRecord, UserProfile};
use async_trait::async_trait;
use chrono::Utc;

/// Decides whether a buyer may purchase admission to an event.
///
/// The check runs **before** any stock is touched; an ineligible buyer never
/// reaches the inventory.
#[async_trait]
pub trait EligibilityPolicy: Send + Sync {
    /// Evaluate the event's admission requirements against the buyer's
    /// profile.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Eligibility`] naming the first requirement
    /// the buyer fails.
    async fn check(&self, event: &EventRecord, user: &UserProfile) -> Result<()>;
}

/// The standard policy: evaluates the event's configured minimum age and
/// required-present profile fields (sex, ID code, instagram handle).
#[derive(Clone, Copy, Debug, Default)]
pub struct ProfileEligibility;

impl ProfileEligibility {
    /// Creates the standard policy
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EligibilityPolicy for ProfileEligibility {
    async fn check(&self, event: &EventRecord, user: &UserProfile) -> Result<()> {
        let requirements = &event.requirements;

        if requirements.age_required {
            match user.age_at(Utc::now()) {
                None => {
                    return Err(AdmissionError::Eligibility {
                        reason: "birthdate is required for this event".to_string(),
                    });
                }
                Some(age) if age < requirements.min_age => {
                    return Err(AdmissionError::Eligibility {
                        reason: format!(
                            "minimum age is {}, buyer is {age}",
                            requirements.min_age
                        ),
                    });
                }
                Some(_) => {}
            }
        }

        if requirements.sex_required && user.sex.is_none() {
            return Err(AdmissionError::Eligibility {
                reason: "sex is required for this event".to_string(),
            });
        }

        if requirements.id_code_required && user.id_code.is_none() {
            return Err(AdmissionError::Eligibility {
                reason: "ID code is required for this event".to_string(),
            });
        }

        if requirements.instagram_required && user.instagram.is_none() {
            return Err(AdmissionError::Eligibility {
                reason: "instagram handle is required for this event".to_string(),
            });
        }

        Ok(())
    }
}
