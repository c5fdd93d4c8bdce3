//! Admission ledger: per-purchase guest records and their approval, payment,
//! and check-in lifecycle.
//!
//! The ledger owns guest records end to end. Purchases gate on eligibility
//! before any stock is touched; privileged operations gate on the permission
//! guard; and wherever money must move, the capture runs first and the state
//! transition commits only on capture success.

use crate::capture::PaymentCapture;
use crate::error::{AdmissionError, Result};
use crate::inventory::TicketInventory;
use crate::permissions::PermissionGuard;
use crate::providers::{EligibilityPolicy, NotificationSender, UserDirectory};
use crate::stores::{EventStore, GuestStore};
use crate::types::{
    ApprovalStatus, EventRecord, Guest, GuestId, PaymentStatus, Permission, Ticket, TicketId,
    UserId, UserProfile,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Owns guest records and drives their two state machines.
pub struct AdmissionLedger {
    guests: Arc<dyn GuestStore>,
    events: Arc<dyn EventStore>,
    inventory: Arc<TicketInventory>,
    eligibility: Arc<dyn EligibilityPolicy>,
    capture: Arc<PaymentCapture>,
    guard: PermissionGuard,
    notifier: Arc<dyn NotificationSender>,
    directory: Arc<dyn UserDirectory>,
    // One async mutex per guest id; decisions and check-ins hold it across
    // the load-charge-persist round-trip.
    locks: Mutex<HashMap<GuestId, Arc<tokio::sync::Mutex<()>>>>,
}

impl AdmissionLedger {
    /// Creates a ledger wired to its collaborators.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        guests: Arc<dyn GuestStore>,
        events: Arc<dyn EventStore>,
        inventory: Arc<TicketInventory>,
        eligibility: Arc<dyn EligibilityPolicy>,
        capture: Arc<PaymentCapture>,
        guard: PermissionGuard,
        notifier: Arc<dyn NotificationSender>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            guests,
            events,
            inventory,
            eligibility,
            capture,
            guard,
            notifier,
            directory,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Records a purchase: eligibility gate, stock allocation, guest
    /// creation.
    ///
    /// The eligibility check runs first; an ineligible buyer never reaches
    /// the inventory and no stock is touched. On a successful allocation the
    /// guest is created in `Request` state with the tier and price frozen at
    /// purchase time, `Booked` when a reservation was requested and `Pending`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::Eligibility`] from the policy, every inventory
    /// rejection of [`TicketInventory::allocate`], and storage errors.
    pub async fn record_purchase(
        &self,
        user: &UserProfile,
        event: &EventRecord,
        ticket_id: TicketId,
        requested_count: u32,
        wants_booking: bool,
    ) -> Result<Guest> {
        self.eligibility.check(event, user).await?;

        let allocation = self
            .inventory
            .allocate(ticket_id, requested_count, wants_booking)
            .await?;

        let guest = Guest::new(
            user.id,
            event.id,
            ticket_id,
            requested_count,
            allocation.price_type,
            wants_booking,
            Utc::now(),
        );
        self.guests.insert(guest.clone()).await?;

        tracing::info!(
            guest_id = %guest.id,
            user_id = %user.id,
            event_id = %event.id,
            ticket_id = %ticket_id,
            buy_count = requested_count,
            tier = %allocation.price_type,
            payment_status = %guest.payment_status,
            "Purchase recorded"
        );

        Ok(guest)
    }

    /// Accepts or denies an admission request.
    ///
    /// Requires the actor to own the event or hold `GuestConfirmation`. Only
    /// `Request → Accepted` and `Request → Denied` are legal. Accepting a
    /// guest who has not pre-reserved (`payment_status != Booked`) captures
    /// `buy_count × current ticket price` first; a capture failure aborts the
    /// whole change and the guest stays in `Request`. A committed change
    /// notifies the guest's push token, fire-and-forget.
    ///
    /// Serialized per guest id, so two concurrent decisions for the same
    /// guest cannot both observe `Request` and capture twice.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::GuestNotFound`], [`AdmissionError::EventNotFound`],
    /// [`AdmissionError::Forbidden`], [`AdmissionError::InvalidTransition`],
    /// capture failures as [`AdmissionError::Payment`] or
    /// [`AdmissionError::NoPaymentMethod`], and storage errors.
    pub async fn change_approval_status(
        &self,
        guest_id: GuestId,
        new_status: ApprovalStatus,
        actor: UserId,
    ) -> Result<Guest> {
        let lock = self.lock_for(guest_id)?;
        let _guard = lock.lock().await;

        let mut guest = self.load_guest(guest_id).await?;
        let event = self.load_event(&guest).await?;

        self.guard
            .authorize(&event, actor, Permission::GuestConfirmation)
            .await?;

        if guest.status != ApprovalStatus::Request || new_status == ApprovalStatus::Request {
            return Err(AdmissionError::InvalidTransition {
                from: guest.status,
                to: new_status,
            });
        }

        match new_status {
            ApprovalStatus::Accepted if guest.payment_status != PaymentStatus::Booked => {
                // Charge first; the status commits only on capture success.
                let ticket = self.inventory.get(guest.ticket_id).await?;
                let amount = charge_amount(&guest, &ticket)?;
                self.capture.charge(guest.user_id, amount).await?;
                guest.payment_status = PaymentStatus::Purchased;
            }
            ApprovalStatus::Denied if guest.payment_status == PaymentStatus::Booked => {
                guest.payment_status = PaymentStatus::Cancelled;
            }
            _ => {}
        }

        guest.status = new_status;
        self.guests.update(guest.clone()).await?;

        tracing::info!(
            guest_id = %guest.id,
            event_id = %event.id,
            status = %guest.status,
            payment_status = %guest.payment_status,
            "Approval status changed"
        );

        self.notify_status_change(&guest, &event);

        Ok(guest)
    }

    /// Consumes a guest's ticket at the door.
    ///
    /// Requires the actor to own the event or hold `QrScanner`. A ticket can
    /// be used exactly once, and only for an accepted guest. A `Booked` guest
    /// checking in with `pay_by_card` is charged first (converting the
    /// reservation into a paid admission); a capture failure aborts and the
    /// ticket stays unused. Serialized per guest id, like approval changes.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::GuestNotFound`], [`AdmissionError::EventNotFound`],
    /// [`AdmissionError::Forbidden`], [`AdmissionError::AlreadyUsed`],
    /// [`AdmissionError::Validation`] for a guest who is not accepted,
    /// capture failures, and storage errors.
    pub async fn use_ticket(
        &self,
        guest_id: GuestId,
        actor: UserId,
        pay_by_card: bool,
    ) -> Result<Guest> {
        let lock = self.lock_for(guest_id)?;
        let _guard = lock.lock().await;

        let mut guest = self.load_guest(guest_id).await?;
        let event = self.load_event(&guest).await?;

        self.guard
            .authorize(&event, actor, Permission::QrScanner)
            .await?;

        if guest.is_ticket_used {
            return Err(AdmissionError::AlreadyUsed);
        }

        if guest.status != ApprovalStatus::Accepted {
            return Err(AdmissionError::Validation {
                reason: format!("guest is {}, only accepted guests can check in", guest.status),
            });
        }

        if guest.payment_status == PaymentStatus::Booked && pay_by_card {
            let ticket = self.inventory.get(guest.ticket_id).await?;
            let amount = charge_amount(&guest, &ticket)?;
            self.capture.charge(guest.user_id, amount).await?;
            guest.payment_status = PaymentStatus::Purchased;
        }

        guest.is_ticket_used = true;
        self.guests.update(guest.clone()).await?;

        tracing::info!(
            guest_id = %guest.id,
            event_id = %event.id,
            payment_status = %guest.payment_status,
            "Ticket used"
        );

        Ok(guest)
    }

    fn lock_for(&self, guest_id: GuestId) -> Result<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| AdmissionError::Internal)?;
        Ok(Arc::clone(
            locks
                .entry(guest_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        ))
    }

    async fn load_guest(&self, guest_id: GuestId) -> Result<Guest> {
        self.guests
            .get(guest_id)
            .await?
            .ok_or(AdmissionError::GuestNotFound { id: guest_id })
    }

    async fn load_event(&self, guest: &Guest) -> Result<EventRecord> {
        self.events
            .get(guest.event_id)
            .await?
            .ok_or(AdmissionError::EventNotFound { id: guest.event_id })
    }

    /// Fire-and-forget push to the guest's registered device. Failures are
    /// logged and never abort the committed state change.
    fn notify_status_change(&self, guest: &Guest, event: &EventRecord) {
        let directory = Arc::clone(&self.directory);
        let notifier = Arc::clone(&self.notifier);
        let guest = guest.clone();
        let event_name = event.name.clone();

        tokio::spawn(async move {
            let profile = match directory.profile(guest.user_id).await {
                Ok(profile) => profile,
                Err(error) => {
                    tracing::warn!(
                        guest_id = %guest.id,
                        %error,
                        "Profile lookup failed, skipping notification"
                    );
                    return;
                }
            };
            let Some(token) = profile.and_then(|profile| profile.push_token) else {
                return;
            };

            let (title, body) = match guest.status {
                ApprovalStatus::Accepted => (
                    "Admission confirmed",
                    format!("You are going to {event_name}!"),
                ),
                ApprovalStatus::Denied => (
                    "Admission declined",
                    format!("Your request for {event_name} was declined"),
                ),
                ApprovalStatus::Request => return,
            };
            let metadata = serde_json::json!({
                "guestId": guest.id.to_string(),
                "eventId": guest.event_id.to_string(),
                "status": guest.status.to_string(),
            });

            if let Err(error) = notifier.push(&token, title, &body, metadata).await {
                tracing::warn!(
                    guest_id = %guest.id,
                    %error,
                    "Push notification failed"
                );
            }
        });
    }
}

/// `buy_count × current ticket price`, falling back to the tier price frozen
/// at purchase when the ticket has since sold out.
fn charge_amount(guest: &Guest, ticket: &Ticket) -> Result<crate::types::Money> {
    let unit_price = ticket
        .current_price()
        .or_else(|| ticket.price_of(guest.price_type))
        .ok_or(AdmissionError::Internal)?;

    unit_price
        .checked_multiply(guest.buy_count)
        .ok_or_else(|| AdmissionError::Validation {
            reason: "charge amount overflows".to_string(),
        })
}
