//! Permission guard: owner-or-delegated authorization for privileged
//! operations.
//!
//! Every privileged admission operation requires the actor to be the event's
//! owner or to hold a specific delegated permission. The guard is the single
//! place that rule lives; operations name the permission they need instead of
//! re-implementing the check inline.

use crate::error::{AdmissionError, Result};
use crate::stores::EditorStore;
use crate::types::{EventRecord, Permission, UserId};
use std::sync::Arc;

/// Resolves whether an actor may perform a privileged operation on an event.
#[derive(Clone)]
pub struct PermissionGuard {
    editors: Arc<dyn EditorStore>,
}

impl PermissionGuard {
    /// Creates a guard backed by the given editor store.
    #[must_use]
    pub fn new(editors: Arc<dyn EditorStore>) -> Self {
        Self { editors }
    }

    /// True iff the actor created the event.
    #[must_use]
    pub fn is_owner(event: &EventRecord, actor: UserId) -> bool {
        event.creator_id == actor
    }

    /// True iff an editor delegation for `(event, actor)` contains
    /// `permission`.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the editor store.
    pub async fn has_permission(
        &self,
        event: &EventRecord,
        actor: UserId,
        permission: Permission,
    ) -> Result<bool> {
        self.editors.has_permission(event.id, actor, permission).await
    }

    /// Authorizes a privileged operation: owner OR delegated permission.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Forbidden`] naming the required permission
    /// when the actor has neither, and storage errors from the editor store.
    pub async fn authorize(
        &self,
        event: &EventRecord,
        actor: UserId,
        permission: Permission,
    ) -> Result<()> {
        if Self::is_owner(event, actor) || self.has_permission(event, actor, permission).await? {
            return Ok(());
        }

        tracing::debug!(
            event_id = %event.id,
            actor = %actor,
            required = %permission,
            "Authorization denied"
        );

        Err(AdmissionError::Forbidden {
            required: permission.to_string(),
        })
    }
}
