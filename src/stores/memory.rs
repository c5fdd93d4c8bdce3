//! In-memory store implementations.
//!
//! Backed by `RwLock<HashMap>` maps. Used as the reference implementation and
//! as the test harness; a hosting application substitutes its own relational
//! stores behind the same traits.

use crate::error::{AdmissionError, Result};
use crate::stores::{EditorStore, EventStore, GuestStore, TicketStore};
use crate::types::{Editor, EventId, EventRecord, Guest, GuestId, Ticket, TicketId, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory ticket store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketStore {
    tickets: Arc<RwLock<HashMap<TicketId, Ticket>>>,
}

impl InMemoryTicketStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn insert(&self, ticket: Ticket) -> Result<()> {
        self.tickets
            .write()
            .map_err(|_| AdmissionError::Internal)?
            .insert(ticket.id, ticket);
        Ok(())
    }

    async fn get(&self, id: TicketId) -> Result<Option<Ticket>> {
        Ok(self
            .tickets
            .read()
            .map_err(|_| AdmissionError::Internal)?
            .get(&id)
            .cloned())
    }

    async fn update(&self, ticket: Ticket) -> Result<()> {
        self.tickets
            .write()
            .map_err(|_| AdmissionError::Internal)?
            .insert(ticket.id, ticket);
        Ok(())
    }
}

/// In-memory guest store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGuestStore {
    guests: Arc<RwLock<HashMap<GuestId, Guest>>>,
}

impl InMemoryGuestStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All guests that reference a ticket.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails.
    pub fn for_ticket(&self, ticket_id: TicketId) -> Result<Vec<Guest>> {
        Ok(self
            .guests
            .read()
            .map_err(|_| AdmissionError::Internal)?
            .values()
            .filter(|guest| guest.ticket_id == ticket_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GuestStore for InMemoryGuestStore {
    async fn insert(&self, guest: Guest) -> Result<()> {
        self.guests
            .write()
            .map_err(|_| AdmissionError::Internal)?
            .insert(guest.id, guest);
        Ok(())
    }

    async fn get(&self, id: GuestId) -> Result<Option<Guest>> {
        Ok(self
            .guests
            .read()
            .map_err(|_| AdmissionError::Internal)?
            .get(&id)
            .cloned())
    }

    async fn update(&self, guest: Guest) -> Result<()> {
        self.guests
            .write()
            .map_err(|_| AdmissionError::Internal)?
            .insert(guest.id, guest);
        Ok(())
    }
}

/// In-memory editor delegation store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEditorStore {
    editors: Arc<RwLock<HashMap<(EventId, UserId), Editor>>>,
}

impl InMemoryEditorStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EditorStore for InMemoryEditorStore {
    async fn grant(&self, editor: Editor) -> Result<()> {
        self.editors
            .write()
            .map_err(|_| AdmissionError::Internal)?
            .insert((editor.event_id, editor.user_id), editor);
        Ok(())
    }

    async fn find(&self, event_id: EventId, user_id: UserId) -> Result<Option<Editor>> {
        Ok(self
            .editors
            .read()
            .map_err(|_| AdmissionError::Internal)?
            .get(&(event_id, user_id))
            .cloned())
    }
}

/// In-memory event lookup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<EventId, EventRecord>>>,
}

impl InMemoryEventStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event so the engine can look it up.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    pub fn insert(&self, event: EventRecord) -> Result<()> {
        self.events
            .write()
            .map_err(|_| AdmissionError::Internal)?
            .insert(event.id, event);
        Ok(())
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn get(&self, id: EventId) -> Result<Option<EventRecord>> {
        Ok(self
            .events
            .read()
            .map_err(|_| AdmissionError::Internal)?
            .get(&id)
            .cloned())
    }
}
