//! Domain types for the admission lifecycle engine.
//!
//! Value objects, entities, and state enums for tier-priced ticket stock and
//! per-purchase admission records. Prices are cents-based integers; counts are
//! unsigned; identifiers are UUID newtypes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a ticket (one purchasable tier-group of an event)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TicketId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a guest (admission record)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuestId(Uuid);

impl GuestId {
    /// Creates a new random `GuestId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `GuestId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user (buyer, organizer, or editor)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from dollars
    ///
    /// # Panics
    ///
    /// Panics if the conversion would overflow (dollars * 100 > `u64::MAX`).
    #[must_use]
    #[allow(clippy::panic)]
    pub const fn from_dollars(dollars: u64) -> Self {
        match dollars.checked_mul(100) {
            Some(cents) => Self(cents),
            None => panic!("Money::from_dollars overflow"),
        }
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Pricing Tiers
// ============================================================================

/// Pricing tier of a ticket.
///
/// Stock depletes in the fixed order `EarlyBird → Regular → LastChance`; the
/// price charged to the next buyer is the price of the first tier that still
/// has stock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Early bird pricing (sold first)
    EarlyBird,
    /// Regular pricing (mandatory tier)
    Regular,
    /// Last chance pricing (sold last)
    LastChance,
}

impl Tier {
    /// Tiers in depletion order
    pub const DEPLETION_ORDER: [Self; 3] = [Self::EarlyBird, Self::Regular, Self::LastChance];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EarlyBird => write!(f, "early-bird"),
            Self::Regular => write!(f, "regular"),
            Self::LastChance => write!(f, "last-chance"),
        }
    }
}

/// One tier bucket: a price and the stock remaining at that price
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierQuota {
    /// Price per unit for this tier
    pub price: Money,
    /// Units remaining in this tier
    pub remaining: u32,
}

impl TierQuota {
    /// Creates a new `TierQuota`
    #[must_use]
    pub const fn new(price: Money, remaining: u32) -> Self {
        Self { price, remaining }
    }
}

/// Creation-time description of one tier: price per unit and initial stock
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    /// Price per unit
    pub price: Money,
    /// Initial stock
    pub count: u32,
}

impl TierSpec {
    /// Creates a new `TierSpec`
    #[must_use]
    pub const fn new(price: Money, count: u32) -> Self {
        Self { price, count }
    }
}

/// Creation-time description of a ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSpec {
    /// Ticket name (e.g., "VIP ticket")
    pub name: String,
    /// Ticket type label (e.g., "VIP")
    pub kind: String,
    /// Optional early-bird tier
    pub early_bird: Option<TierSpec>,
    /// Mandatory regular tier
    pub regular: TierSpec,
    /// Optional last-chance tier
    pub last_chance: Option<TierSpec>,
    /// Whether a reservation without immediate payment is allowed
    pub can_be_booked: bool,
}

// ============================================================================
// Ticket Entity
// ============================================================================

/// Ticket entity: one purchasable tier-group for an event.
///
/// The per-tier quotas are the only stored stock counters. The aggregate
/// remaining count and the active price are derived reads, so the two can
/// never drift apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket identifier
    pub id: TicketId,
    /// Ticket name
    pub name: String,
    /// Ticket type label
    pub kind: String,
    /// Early-bird tier, if the ticket has one
    pub early_bird: Option<TierQuota>,
    /// Regular tier (always present)
    pub regular: TierQuota,
    /// Last-chance tier, if the ticket has one
    pub last_chance: Option<TierQuota>,
    /// Total stock across all tiers, fixed at creation
    pub total_count: u32,
    /// Whether a reservation without immediate payment is allowed
    pub can_be_booked: bool,
    /// When the ticket was created
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Returns the tier bucket for a given tier, if the ticket has one
    #[must_use]
    pub fn quota(&self, tier: Tier) -> Option<&TierQuota> {
        match tier {
            Tier::EarlyBird => self.early_bird.as_ref(),
            Tier::Regular => Some(&self.regular),
            Tier::LastChance => self.last_chance.as_ref(),
        }
    }

    /// Mutable access to a tier bucket
    pub fn quota_mut(&mut self, tier: Tier) -> Option<&mut TierQuota> {
        match tier {
            Tier::EarlyBird => self.early_bird.as_mut(),
            Tier::Regular => Some(&mut self.regular),
            Tier::LastChance => self.last_chance.as_mut(),
        }
    }

    /// Remaining stock across all tiers (computed, not stored)
    #[must_use]
    pub fn current_count(&self) -> u32 {
        Tier::DEPLETION_ORDER
            .iter()
            .filter_map(|tier| self.quota(*tier))
            .map(|quota| quota.remaining)
            .sum()
    }

    /// The tier the next buyer draws from: the first tier in depletion order
    /// with remaining stock. `None` when sold out.
    #[must_use]
    pub fn active_tier(&self) -> Option<Tier> {
        Tier::DEPLETION_ORDER
            .into_iter()
            .find(|tier| self.quota(*tier).is_some_and(|quota| quota.remaining > 0))
    }

    /// The price the next buyer pays. `None` when sold out.
    #[must_use]
    pub fn current_price(&self) -> Option<Money> {
        self.active_tier()
            .and_then(|tier| self.quota(tier))
            .map(|quota| quota.price)
    }

    /// The unit price of a specific tier, if the ticket has that tier
    #[must_use]
    pub fn price_of(&self, tier: Tier) -> Option<Money> {
        self.quota(tier).map(|quota| quota.price)
    }
}

/// Result of a successful stock allocation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Unit price charged, frozen at the start of the allocation
    pub price_charged: Money,
    /// Tier the stock was drawn from
    pub price_type: Tier,
}

// ============================================================================
// Guest (Admission Record)
// ============================================================================

/// Approval status of an admission record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    /// Awaiting organizer decision (initial)
    Request,
    /// Admitted by the organizer
    Accepted,
    /// Rejected by the organizer
    Denied,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => write!(f, "request"),
            Self::Accepted => write!(f, "accepted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Payment status of an admission record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Purchase recorded, capture deferred to approval or check-in
    Pending,
    /// Reservation without immediate payment (`can_be_booked` tickets only)
    Booked,
    /// Reservation voided (guest denied while booked)
    Cancelled,
    /// Gateway reported a decline during out-of-band reconciliation
    Declined,
    /// Capture succeeded
    Purchased,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Booked => write!(f, "booked"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Declined => write!(f, "declined"),
            Self::Purchased => write!(f, "purchased"),
        }
    }
}

/// Guest entity: one purchase of N units of one ticket by one user for one
/// event, tracked through approval, payment, and check-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    /// Unique guest identifier
    pub id: GuestId,
    /// Buyer
    pub user_id: UserId,
    /// Event the admission is for
    pub event_id: EventId,
    /// Ticket the stock was drawn from
    pub ticket_id: TicketId,
    /// Organizer approval status
    pub status: ApprovalStatus,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Whether the ticket has been consumed at check-in
    pub is_ticket_used: bool,
    /// When the purchase was recorded
    pub buy_date: DateTime<Utc>,
    /// Units purchased (>= 1)
    pub buy_count: u32,
    /// Tier charged at purchase time, independent of later tier drift
    pub price_type: Tier,
}

impl Guest {
    /// Creates a new `Guest` in the initial state for a fresh allocation
    #[must_use]
    pub fn new(
        user_id: UserId,
        event_id: EventId,
        ticket_id: TicketId,
        buy_count: u32,
        price_type: Tier,
        booked: bool,
        buy_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: GuestId::new(),
            user_id,
            event_id,
            ticket_id,
            status: ApprovalStatus::Request,
            payment_status: if booked {
                PaymentStatus::Booked
            } else {
                PaymentStatus::Pending
            },
            is_ticket_used: false,
            buy_date,
            buy_count,
            price_type,
        }
    }
}

// ============================================================================
// Permissions
// ============================================================================

/// A delegated organizer permission
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// May check guests in at the door
    QrScanner,
    /// May accept or deny admission requests
    GuestConfirmation,
    /// May create referral links
    CreateReferralLinks,
    /// May edit event details
    EditEvent,
    /// May manage other editors
    EditAccess,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QrScanner => write!(f, "qr-scanner"),
            Self::GuestConfirmation => write!(f, "guest-confirmation"),
            Self::CreateReferralLinks => write!(f, "create-referral-links"),
            Self::EditEvent => write!(f, "edit-event"),
            Self::EditAccess => write!(f, "edit-access"),
        }
    }
}

/// A delegation of a subset of organizer permissions to a user for one event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editor {
    /// Event the delegation applies to
    pub event_id: EventId,
    /// User holding the delegation
    pub user_id: UserId,
    /// Granted permissions
    pub permissions: HashSet<Permission>,
}

impl Editor {
    /// Creates a new `Editor` delegation
    #[must_use]
    pub fn new(
        event_id: EventId,
        user_id: UserId,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self {
            event_id,
            user_id,
            permissions: permissions.into_iter().collect(),
        }
    }
}

// ============================================================================
// Event and Buyer Profile (collaborator-owned, read here)
// ============================================================================

/// Profile fields an event may require before admitting a buyer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRequirements {
    /// Whether a minimum age is enforced
    pub age_required: bool,
    /// Minimum age when `age_required` is set
    pub min_age: u32,
    /// Whether the buyer must have declared their sex
    pub sex_required: bool,
    /// Whether the buyer must have a registered ID code
    pub id_code_required: bool,
    /// Whether the buyer must have a registered instagram handle
    pub instagram_required: bool,
}

/// The slice of an event this engine reads: identity, ownership, and the
/// admission requirements configured by the organizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event identifier
    pub id: EventId,
    /// Event name
    pub name: String,
    /// Owner of the event
    pub creator_id: UserId,
    /// Eligibility requirements for buyers
    pub requirements: AdmissionRequirements,
}

/// The slice of a user profile this engine reads for eligibility checks and
/// push notifications.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Birth date, if declared
    pub birthdate: Option<NaiveDate>,
    /// Declared sex, if any
    pub sex: Option<String>,
    /// Registered national ID code, if any
    pub id_code: Option<String>,
    /// Registered instagram handle, if any
    pub instagram: Option<String>,
    /// Registered push token, if the user has a device
    pub push_token: Option<String>,
}

impl UserProfile {
    /// Whole years between the birthdate and `now`. `None` when no birthdate
    /// is declared.
    #[must_use]
    pub fn age_at(&self, now: DateTime<Utc>) -> Option<u32> {
        let birth = self.birthdate?;
        now.date_naive().years_since(birth)
    }
}

/// A user's saved card abstraction, owned by the user-management collaborator.
///
/// Exactly zero or one instrument is flagged selected at a time; the
/// collaborator enforces that, not this engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstrument {
    /// Opaque gateway token for the stored card
    pub token: String,
    /// Card verification value
    pub cvv: String,
    /// Card holder name
    pub card_holder: String,
    /// Display-formatted card number (masked)
    pub display_number: String,
    /// Whether this is the instrument charges are made against
    pub is_selected: bool,
}
