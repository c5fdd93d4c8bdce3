//! Ticket inventory: tier-based stock counters and atomic allocation.
//!
//! The per-tier counters are the single source of truth; the aggregate
//! remaining count and the active price are derived from them on every read.
//! Allocation against one ticket is serialized through a per-ticket-id async
//! mutex so concurrent buyers can never both debit the last unit.

use crate::error::{AdmissionError, Result};
use crate::stores::TicketStore;
use crate::types::{Allocation, Ticket, TicketId, TicketSpec, TierQuota};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

impl Ticket {
    /// Debits `requested_count` units from this ticket's stock.
    ///
    /// Depletion order is fixed: `EarlyBird → Regular → LastChance`. The whole
    /// request is served from the first tier with remaining stock; requests
    /// never split across tiers. The buyer pays the price of the tier drawn
    /// from, frozen at the start of the allocation. Rejections mutate nothing.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::Validation`] when `requested_count` is zero
    /// - [`AdmissionError::SoldOut`] when no tier has stock
    /// - [`AdmissionError::BookingNotAllowed`] when `wants_booking` is set on
    ///   a ticket that cannot be booked
    /// - [`AdmissionError::InsufficientStock`] when the active tier cannot
    ///   serve the whole request
    pub fn allocate(&mut self, requested_count: u32, wants_booking: bool) -> Result<Allocation> {
        if requested_count == 0 {
            return Err(AdmissionError::Validation {
                reason: "requested count must be at least 1".to_string(),
            });
        }

        let Some(tier) = self.active_tier() else {
            return Err(AdmissionError::SoldOut);
        };

        if wants_booking && !self.can_be_booked {
            return Err(AdmissionError::BookingNotAllowed);
        }

        let Some(quota) = self.quota_mut(tier) else {
            return Err(AdmissionError::SoldOut);
        };

        if quota.remaining < requested_count {
            return Err(AdmissionError::InsufficientStock {
                requested: requested_count,
                available: quota.remaining,
            });
        }

        let price_charged = quota.price;
        quota.remaining -= requested_count;

        Ok(Allocation {
            price_charged,
            price_type: tier,
        })
    }
}

/// Owns tier-based stock for all tickets and exposes atomic allocation.
pub struct TicketInventory {
    tickets: Arc<dyn TicketStore>,
    // One async mutex per ticket id; allocation holds it across the
    // load-mutate-persist round-trip.
    locks: Mutex<HashMap<TicketId, Arc<tokio::sync::Mutex<()>>>>,
}

impl TicketInventory {
    /// Creates an inventory backed by the given store.
    #[must_use]
    pub fn new(tickets: Arc<dyn TicketStore>) -> Self {
        Self {
            tickets,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a ticket from a spec and persists it.
    ///
    /// The regular tier is mandatory (enforced by [`TicketSpec`]'s type);
    /// total stock is the sum of all tier counts and is fixed for the
    /// ticket's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Validation`] for an empty name, zero total
    /// stock, or a tier sum that overflows, and storage errors from the
    /// ticket store.
    pub async fn create(&self, spec: TicketSpec) -> Result<Ticket> {
        if spec.name.trim().is_empty() {
            return Err(AdmissionError::Validation {
                reason: "ticket name must not be empty".to_string(),
            });
        }

        let tier_counts = [
            spec.early_bird.map_or(0, |tier| tier.count),
            spec.regular.count,
            spec.last_chance.map_or(0, |tier| tier.count),
        ];
        let mut total_count: u32 = 0;
        for count in tier_counts {
            total_count = total_count
                .checked_add(count)
                .ok_or_else(|| AdmissionError::Validation {
                    reason: "total ticket count overflows".to_string(),
                })?;
        }
        if total_count == 0 {
            return Err(AdmissionError::Validation {
                reason: "ticket must have at least one unit of stock".to_string(),
            });
        }

        let ticket = Ticket {
            id: TicketId::new(),
            name: spec.name,
            kind: spec.kind,
            early_bird: spec.early_bird.map(|tier| TierQuota::new(tier.price, tier.count)),
            regular: TierQuota::new(spec.regular.price, spec.regular.count),
            last_chance: spec.last_chance.map(|tier| TierQuota::new(tier.price, tier.count)),
            total_count,
            can_be_booked: spec.can_be_booked,
            created_at: Utc::now(),
        };

        self.tickets.insert(ticket.clone()).await?;

        tracing::info!(
            ticket_id = %ticket.id,
            total_count = ticket.total_count,
            active_tier = ?ticket.active_tier(),
            "Ticket created"
        );

        Ok(ticket)
    }

    /// Allocates stock for a purchase request.
    ///
    /// Serialized per ticket id: the read-modify-write against the tier
    /// counters happens under an exclusive lock, so a rejection is a
    /// "never started", not a rollback.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::TicketNotFound`] for an unknown id, plus every
    /// rejection of [`Ticket::allocate`] and storage errors.
    pub async fn allocate(
        &self,
        ticket_id: TicketId,
        requested_count: u32,
        wants_booking: bool,
    ) -> Result<Allocation> {
        let lock = self.lock_for(ticket_id)?;
        let _guard = lock.lock().await;

        let Some(mut ticket) = self.tickets.get(ticket_id).await? else {
            return Err(AdmissionError::TicketNotFound { id: ticket_id });
        };

        let allocation = ticket.allocate(requested_count, wants_booking)?;
        self.tickets.update(ticket.clone()).await?;

        tracing::debug!(
            ticket_id = %ticket_id,
            tier = %allocation.price_type,
            unit_price = allocation.price_charged.cents(),
            requested = requested_count,
            remaining = ticket.current_count(),
            "Stock allocated"
        );

        Ok(allocation)
    }

    /// Loads a ticket for read-only callers.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::TicketNotFound`] for an unknown id and storage
    /// errors.
    pub async fn get(&self, ticket_id: TicketId) -> Result<Ticket> {
        self.tickets
            .get(ticket_id)
            .await?
            .ok_or(AdmissionError::TicketNotFound { id: ticket_id })
    }

    fn lock_for(&self, ticket_id: TicketId) -> Result<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| AdmissionError::Internal)?;
        Ok(Arc::clone(
            locks
                .entry(ticket_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::stores::InMemoryTicketStore;
    use crate::types::{Money, Tier, TierSpec};

    fn three_tier_spec() -> TicketSpec {
        TicketSpec {
            name: "General admission".to_string(),
            kind: "GA".to_string(),
            early_bird: Some(TierSpec::new(Money::from_dollars(10), 2)),
            regular: TierSpec::new(Money::from_dollars(20), 3),
            last_chance: Some(TierSpec::new(Money::from_dollars(30), 2)),
            can_be_booked: true,
        }
    }

    fn inventory() -> TicketInventory {
        TicketInventory::new(Arc::new(InMemoryTicketStore::new()))
    }

    #[tokio::test]
    async fn create_derives_counts_and_active_tier() {
        let inventory = inventory();
        let ticket = inventory.create(three_tier_spec()).await.unwrap();

        assert_eq!(ticket.total_count, 7);
        assert_eq!(ticket.current_count(), 7);
        assert_eq!(ticket.active_tier(), Some(Tier::EarlyBird));
        assert_eq!(ticket.current_price(), Some(Money::from_dollars(10)));
    }

    #[tokio::test]
    async fn create_without_early_bird_starts_regular() {
        let inventory = inventory();
        let spec = TicketSpec {
            early_bird: None,
            ..three_tier_spec()
        };
        let ticket = inventory.create(spec).await.unwrap();

        assert_eq!(ticket.active_tier(), Some(Tier::Regular));
        assert_eq!(ticket.current_price(), Some(Money::from_dollars(20)));
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let inventory = inventory();
        let spec = TicketSpec {
            name: "  ".to_string(),
            ..three_tier_spec()
        };
        assert!(matches!(
            inventory.create(spec).await,
            Err(AdmissionError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn create_rejects_zero_total_stock() {
        let inventory = inventory();
        let spec = TicketSpec {
            early_bird: None,
            regular: TierSpec::new(Money::from_dollars(20), 0),
            last_chance: None,
            ..three_tier_spec()
        };
        assert!(matches!(
            inventory.create(spec).await,
            Err(AdmissionError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn depletion_order_is_early_bird_then_regular_then_last_chance() {
        let inventory = inventory();
        let ticket = inventory.create(three_tier_spec()).await.unwrap();

        let mut tiers = Vec::new();
        for _ in 0..4 {
            let allocation = inventory.allocate(ticket.id, 1, false).await.unwrap();
            tiers.push((allocation.price_type, allocation.price_charged));
        }

        assert_eq!(
            tiers,
            vec![
                (Tier::EarlyBird, Money::from_dollars(10)),
                (Tier::EarlyBird, Money::from_dollars(10)),
                (Tier::Regular, Money::from_dollars(20)),
                (Tier::Regular, Money::from_dollars(20)),
            ]
        );

        // Two regular units remain, so the next buyer still sees regular.
        let current = inventory.get(ticket.id).await.unwrap();
        assert_eq!(current.active_tier(), Some(Tier::Regular));
        assert_eq!(current.current_count(), 3);

        let fifth = inventory.allocate(ticket.id, 1, false).await.unwrap();
        assert_eq!(fifth.price_type, Tier::Regular);

        let sixth = inventory.allocate(ticket.id, 1, false).await.unwrap();
        assert_eq!(sixth.price_type, Tier::LastChance);
        assert_eq!(sixth.price_charged, Money::from_dollars(30));
    }

    #[tokio::test]
    async fn exhausting_a_tier_advances_the_price_for_the_next_caller() {
        let inventory = inventory();
        let ticket = inventory.create(three_tier_spec()).await.unwrap();

        inventory.allocate(ticket.id, 2, false).await.unwrap();

        let current = inventory.get(ticket.id).await.unwrap();
        assert_eq!(current.active_tier(), Some(Tier::Regular));
        assert_eq!(current.current_price(), Some(Money::from_dollars(20)));
    }

    #[tokio::test]
    async fn sold_out_ticket_rejects_allocation() {
        let inventory = inventory();
        let spec = TicketSpec {
            early_bird: None,
            regular: TierSpec::new(Money::from_dollars(20), 1),
            last_chance: None,
            ..three_tier_spec()
        };
        let ticket = inventory.create(spec).await.unwrap();

        inventory.allocate(ticket.id, 1, false).await.unwrap();
        assert_eq!(
            inventory.allocate(ticket.id, 1, false).await,
            Err(AdmissionError::SoldOut)
        );
    }

    #[tokio::test]
    async fn oversized_request_rejects_without_mutation() {
        let inventory = inventory();
        let ticket = inventory.create(three_tier_spec()).await.unwrap();

        // Early bird has 2 left; a request for 3 cannot split across tiers.
        let result = inventory.allocate(ticket.id, 3, false).await;
        assert_eq!(
            result,
            Err(AdmissionError::InsufficientStock {
                requested: 3,
                available: 2
            })
        );

        let current = inventory.get(ticket.id).await.unwrap();
        assert_eq!(current.current_count(), 7);
        assert_eq!(current.early_bird.unwrap().remaining, 2);
        assert_eq!(current.regular.remaining, 3);
    }

    #[tokio::test]
    async fn booking_gate_rejects_without_mutation() {
        let inventory = inventory();
        let spec = TicketSpec {
            can_be_booked: false,
            ..three_tier_spec()
        };
        let ticket = inventory.create(spec).await.unwrap();

        assert_eq!(
            inventory.allocate(ticket.id, 1, true).await,
            Err(AdmissionError::BookingNotAllowed)
        );
        assert_eq!(inventory.get(ticket.id).await.unwrap().current_count(), 7);
    }

    #[tokio::test]
    async fn zero_count_request_is_invalid() {
        let inventory = inventory();
        let ticket = inventory.create(three_tier_spec()).await.unwrap();

        assert!(matches!(
            inventory.allocate(ticket.id, 0, false).await,
            Err(AdmissionError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_ticket_is_not_found() {
        let inventory = inventory();
        let id = TicketId::new();
        assert_eq!(
            inventory.allocate(id, 1, false).await,
            Err(AdmissionError::TicketNotFound { id })
        );
    }
}
