//! Property-based tests for the tier allocation algorithm.
//!
//! Drives the pure debit logic over arbitrary tier configurations and
//! request sequences and checks the inventory invariants hold at every step.
//!
//! Run with: `cargo test --test allocation_property_test`

#![allow(clippy::unwrap_used)]

use admissions::types::{Money, Ticket, TicketId, Tier, TierQuota};
use chrono::Utc;
use proptest::prelude::*;

fn ticket(early_bird: u32, regular: u32, last_chance: u32) -> Ticket {
    Ticket {
        id: TicketId::new(),
        name: "prop ticket".to_string(),
        kind: "GA".to_string(),
        early_bird: (early_bird > 0).then(|| TierQuota::new(Money::from_dollars(10), early_bird)),
        regular: TierQuota::new(Money::from_dollars(20), regular),
        last_chance: (last_chance > 0)
            .then(|| TierQuota::new(Money::from_dollars(30), last_chance)),
        total_count: early_bird + regular + last_chance,
        can_be_booked: true,
        created_at: Utc::now(),
    }
}

const fn tier_rank(tier: Tier) -> u8 {
    match tier {
        Tier::EarlyBird => 0,
        Tier::Regular => 1,
        Tier::LastChance => 2,
    }
}

proptest! {
    /// Units sold never exceed the total, and the derived count plus units
    /// sold always equals the total (no drift, no partial debits).
    #[test]
    fn never_oversells(
        early_bird in 0u32..20,
        regular in 0u32..20,
        last_chance in 0u32..20,
        requests in proptest::collection::vec(1u32..6, 0..60),
    ) {
        let mut ticket = ticket(early_bird, regular, last_chance);
        let total = ticket.total_count;
        let mut sold = 0u32;

        for requested in requests {
            if ticket.allocate(requested, false).is_ok() {
                sold += requested;
            }
            prop_assert_eq!(ticket.current_count() + sold, total);
            prop_assert!(sold <= total);
        }
    }

    /// Successful allocations draw tiers in depletion order: the tier
    /// sequence is non-decreasing and each charge matches that tier's price.
    #[test]
    fn tiers_deplete_in_order_at_their_own_price(
        early_bird in 0u32..10,
        regular in 0u32..10,
        last_chance in 0u32..10,
        requests in proptest::collection::vec(1u32..4, 0..40),
    ) {
        let mut ticket = ticket(early_bird, regular, last_chance);
        let mut last_rank = 0u8;

        for requested in requests {
            let expected_price = ticket.current_price();
            if let Ok(allocation) = ticket.allocate(requested, false) {
                prop_assert!(tier_rank(allocation.price_type) >= last_rank);
                last_rank = tier_rank(allocation.price_type);
                prop_assert_eq!(Some(allocation.price_charged), expected_price);
            }
        }
    }

    /// A rejected allocation leaves the ticket byte-identical.
    #[test]
    fn rejections_mutate_nothing(
        early_bird in 0u32..5,
        regular in 0u32..5,
        last_chance in 0u32..5,
        requested in 1u32..40,
    ) {
        let mut ticket = ticket(early_bird, regular, last_chance);
        let snapshot = ticket.clone();

        if ticket.allocate(requested, false).is_err() {
            prop_assert_eq!(ticket, snapshot);
        }
    }

    /// Booking requests against a non-bookable ticket are rejected without
    /// any debit, regardless of stock.
    #[test]
    fn booking_gate_never_debits(
        regular in 0u32..10,
        requested in 1u32..5,
    ) {
        let mut ticket = ticket(0, regular, 0);
        ticket.can_be_booked = false;
        let snapshot = ticket.clone();

        prop_assert!(ticket.allocate(requested, true).is_err());
        prop_assert_eq!(ticket, snapshot);
    }
}
