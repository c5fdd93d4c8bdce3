//! Persistence traits and the in-memory reference implementation.
//!
//! The engine persists relational rows for tickets, guests, and editor
//! delegations, and reads events owned by the event-management collaborator.
//! Storage technology is the hosting application's choice; these traits are
//! the seam. The [`memory`] module provides the in-memory implementation used
//! as the reference store and as the test harness.

pub mod memory;

use crate::error::Result;
use crate::types::{Editor, EventId, EventRecord, Guest, GuestId, Permission, Ticket, TicketId, UserId};
use async_trait::async_trait;

pub use memory::{InMemoryEditorStore, InMemoryEventStore, InMemoryGuestStore, InMemoryTicketStore};

/// Ticket persistence.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Persist a newly created ticket.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    async fn insert(&self, ticket: Ticket) -> Result<()>;

    /// Load a ticket by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails.
    async fn get(&self, id: TicketId) -> Result<Option<Ticket>>;

    /// Persist updated tier counters for an existing ticket.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    async fn update(&self, ticket: Ticket) -> Result<()>;
}

/// Guest (admission record) persistence.
#[async_trait]
pub trait GuestStore: Send + Sync {
    /// Persist a newly created guest.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    async fn insert(&self, guest: Guest) -> Result<()>;

    /// Load a guest by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails.
    async fn get(&self, id: GuestId) -> Result<Option<Guest>>;

    /// Persist an updated guest.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    async fn update(&self, guest: Guest) -> Result<()>;
}

/// Editor delegation persistence.
#[async_trait]
pub trait EditorStore: Send + Sync {
    /// Grant (or replace) a delegation.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    async fn grant(&self, editor: Editor) -> Result<()>;

    /// Look up the delegation for a user on an event, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails.
    async fn find(&self, event_id: EventId, user_id: UserId) -> Result<Option<Editor>>;

    /// Whether a delegation containing `permission` exists for `(event, user)`.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails.
    async fn has_permission(
        &self,
        event_id: EventId,
        user_id: UserId,
        permission: Permission,
    ) -> Result<bool> {
        Ok(self
            .find(event_id, user_id)
            .await?
            .is_some_and(|editor| editor.permissions.contains(&permission)))
    }
}

/// Read access to events, owned by the event-management collaborator.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Load an event by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails.
    async fn get(&self, id: EventId) -> Result<Option<EventRecord>>;
}
