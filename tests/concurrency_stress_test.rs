//! Concurrency stress tests for last-unit scenarios.
//!
//! Verifies that under heavy concurrent load the per-ticket and per-guest
//! serialization holds: buyers can never both observe sufficient stock and
//! both succeed, and a guest is never charged twice.
//!
//! Run with: `cargo test --test concurrency_stress_test -- --nocapture`

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use admissions::capture::PaymentCapture;
use admissions::error::AdmissionError;
use admissions::ledger::AdmissionLedger;
use admissions::mocks::{MockPaymentGateway, MockUserDirectory, RecordingNotifier};
use admissions::permissions::PermissionGuard;
use admissions::providers::ProfileEligibility;
use admissions::stores::{
    EventStore, GuestStore, InMemoryEditorStore, InMemoryEventStore, InMemoryGuestStore,
    InMemoryTicketStore,
};
use admissions::types::{
    AdmissionRequirements, ApprovalStatus, EventId, EventRecord, Money, TicketSpec, TierSpec,
    UserId, UserProfile,
};
use admissions::TicketInventory;
use std::sync::Arc;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn single_tier(count: u32) -> TicketSpec {
    TicketSpec {
        name: "Standing".to_string(),
        kind: "GA".to_string(),
        early_bird: None,
        regular: TierSpec::new(Money::from_dollars(25), count),
        last_chance: None,
        can_be_booked: false,
    }
}

fn buyer(n: u32) -> UserProfile {
    UserProfile {
        id: UserId::new(),
        name: format!("Buyer {n}"),
        birthdate: None,
        sex: None,
        id_code: None,
        instagram: None,
        push_token: None,
    }
}

/// 100 concurrent buyers for 1 unit: exactly one wins, the rest fail
/// gracefully, and the counter never goes negative.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn last_unit_100_concurrent_buyers() {
    init_tracing();
    let inventory = Arc::new(TicketInventory::new(Arc::new(InMemoryTicketStore::new())));
    let ticket = inventory.create(single_tier(1)).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..100 {
        let inventory = Arc::clone(&inventory);
        let ticket_id = ticket.id;
        tasks.push(tokio::spawn(async move {
            inventory.allocate(ticket_id, 1, false).await
        }));
    }

    let mut successes = 0;
    let mut sold_out = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AdmissionError::SoldOut) => sold_out += 1,
            Err(other) => panic!("unexpected rejection: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(sold_out, 99);
    assert_eq!(inventory.get(ticket.id).await.unwrap().current_count(), 0);
}

/// n+1 units requested concurrently against n units of stock: total units
/// sold never exceed n.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_demand_exceeding_stock_by_one() {
    init_tracing();
    let inventory = Arc::new(TicketInventory::new(Arc::new(InMemoryTicketStore::new())));
    let ticket = inventory.create(single_tier(5)).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..6 {
        let inventory = Arc::clone(&inventory);
        let ticket_id = ticket.id;
        tasks.push(tokio::spawn(async move {
            inventory.allocate(ticket_id, 1, false).await
        }));
    }

    let mut sold = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            sold += 1;
        }
    }

    assert_eq!(sold, 5);
    assert_eq!(inventory.get(ticket.id).await.unwrap().current_count(), 0);
}

/// The same guarantee holds end to end through the ledger: the sum of
/// `buy_count` across created guests never exceeds the ticket's stock.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn guest_rows_never_exceed_stock() {
    init_tracing();
    let tickets = Arc::new(InMemoryTicketStore::new());
    let guests = Arc::new(InMemoryGuestStore::new());
    let events = Arc::new(InMemoryEventStore::new());
    let directory = MockUserDirectory::new();

    let event = EventRecord {
        id: EventId::new(),
        name: "Club night".to_string(),
        creator_id: UserId::new(),
        requirements: AdmissionRequirements::default(),
    };
    events.insert(event.clone()).unwrap();

    let inventory = Arc::new(TicketInventory::new(tickets));
    let ticket = inventory.create(single_tier(5)).await.unwrap();

    let ledger = Arc::new(AdmissionLedger::new(
        Arc::clone(&guests) as Arc<dyn GuestStore>,
        Arc::clone(&events) as Arc<dyn EventStore>,
        Arc::clone(&inventory),
        Arc::new(ProfileEligibility::new()),
        Arc::new(PaymentCapture::new(
            Arc::new(directory.clone()),
            Arc::new(MockPaymentGateway::approving()),
            Duration::from_secs(2),
        )),
        PermissionGuard::new(Arc::new(InMemoryEditorStore::new())),
        Arc::new(RecordingNotifier::new()),
        Arc::new(directory),
    ));

    let mut tasks = Vec::new();
    for n in 0..8u32 {
        let ledger = Arc::clone(&ledger);
        let event = event.clone();
        let ticket_id = ticket.id;
        tasks.push(tokio::spawn(async move {
            let buyer = buyer(n);
            ledger
                .record_purchase(&buyer, &event, ticket_id, 1, false)
                .await
        }));
    }

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            created += 1;
        }
    }

    let rows = guests.for_ticket(ticket.id).unwrap();
    let units_sold: u32 = rows.iter().map(|guest| guest.buy_count).sum();

    assert_eq!(created, 5);
    assert_eq!(rows.len(), 5);
    assert_eq!(units_sold, 5);
}

/// Two concurrent accepts of the same pending guest: one commits and
/// captures, the other sees the decision already made, and the card is
/// charged exactly once.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_decisions_capture_exactly_once() {
    init_tracing();
    let tickets = Arc::new(InMemoryTicketStore::new());
    let guests = Arc::new(InMemoryGuestStore::new());
    let events = Arc::new(InMemoryEventStore::new());
    let directory = MockUserDirectory::new();
    let gateway = MockPaymentGateway::approving();

    let owner = UserId::new();
    let event = EventRecord {
        id: EventId::new(),
        name: "Club night".to_string(),
        creator_id: owner,
        requirements: AdmissionRequirements::default(),
    };
    events.insert(event.clone()).unwrap();

    let inventory = Arc::new(TicketInventory::new(tickets));
    let ticket = inventory.create(single_tier(5)).await.unwrap();

    let ledger = Arc::new(AdmissionLedger::new(
        Arc::clone(&guests) as Arc<dyn GuestStore>,
        Arc::clone(&events) as Arc<dyn EventStore>,
        Arc::clone(&inventory),
        Arc::new(ProfileEligibility::new()),
        Arc::new(PaymentCapture::new(
            Arc::new(directory.clone()),
            Arc::new(gateway.clone()),
            Duration::from_secs(2),
        )),
        PermissionGuard::new(Arc::new(InMemoryEditorStore::new())),
        Arc::new(RecordingNotifier::new()),
        Arc::new(directory.clone()),
    ));

    let buyer = buyer(0);
    directory.select_card(buyer.id, "tok_race");
    let guest = ledger
        .record_purchase(&buyer, &event, ticket.id, 1, false)
        .await
        .unwrap();
    let guest_id = guest.id;

    let mut tasks = Vec::new();
    for _ in 0..2 {
        let ledger = Arc::clone(&ledger);
        tasks.push(tokio::spawn(async move {
            ledger
                .change_approval_status(guest_id, ApprovalStatus::Accepted, owner)
                .await
        }));
    }

    let mut accepted = 0;
    let mut already_decided = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(AdmissionError::InvalidTransition { .. }) => already_decided += 1,
            Err(other) => panic!("unexpected rejection: {other}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(already_decided, 1);
    assert_eq!(gateway.charge_count(), 1);
}
