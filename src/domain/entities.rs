use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles recognized across the marketplace.
///
/// Every role-keyed decision in the crate is an exhaustive `match` on this
/// enum, so adding a role is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    EventPlanner,
    Vendor,
    Client,
}

impl Role {
    // Wire value used in query strings and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::EventPlanner => "EVENT_PLANNER",
            Role::Vendor => "VENDOR",
            Role::Client => "CLIENT",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "ADMIN" => Some(Role::Admin),
            "EVENT_PLANNER" => Some(Role::EventPlanner),
            "VENDOR" => Some(Role::Vendor),
            "CLIENT" => Some(Role::Client),
            _ => None,
        }
    }
}

/// Authenticated session mirrored into the storage scopes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub user_id: String,
    pub display_name: String,
}

/// One side of a conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub user_id: String,
    pub role: Role,
    pub display_name: String,
}

/// A chat message. `optimistic` is client-only and never serialized;
/// `client_ref` is the correlation id echoed back by the realtime channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub client_ref: Option<String>,
    pub optimistic: bool,
}

/// A conversation between exactly two participants.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversation {
    pub id: String,
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
    pub unread_count: u32,
    // Drives the newest-first ordering of the conversation list.
    pub last_activity: DateTime<Utc>,
}

impl Conversation {
    /// Returns true if `user_id` is one of the participants.
    pub fn involves(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    /// The participant who is not `me`, when present.
    pub fn counterpart(&self, me: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id != me)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Terminal states end the verification polling loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// Priced tier of a service. Immutable once created; edited as a whole
/// through vendor service management.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTier {
    pub id: String,
    pub tier: TierLevel,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

/// A vendor service offering listed in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub vendor_id: String,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub tiers: Vec<ServiceTier>,
}

impl Service {
    pub fn tier(&self, tier_id: &str) -> Option<&ServiceTier> {
        self.tiers.iter().find(|t| t.id == tier_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub service_id: String,
    #[serde(default)]
    pub service_tier_price_id: Option<String>,
    #[serde(default)]
    pub selected_tier: Option<TierLevel>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub attendees: u32,
    #[serde(default)]
    pub special_requests: String,
    pub status: BookingStatus,
    // Some backend responses omit the vendor; callers fall back to the
    // service's vendor when this is empty.
    #[serde(default)]
    pub vendor_id: String,
    // Priced tier and flat amount both come back optional; the payment
    // amount falls back through tier price -> amount -> service base price.
    #[serde(default)]
    pub tier: Option<ServiceTier>,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub vendor_id: String,
    pub user_id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub tx_ref: String,
}

/// In-progress booking form state. Fields stay optional until the user has
/// filled them in; `submission()` is the gate to the REST call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingDraft {
    pub service_id: String,
    pub service_tier_price_id: Option<String>,
    pub selected_tier: Option<TierLevel>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: String,
    pub attendees: u32,
    pub special_requests: String,
}

impl BookingDraft {
    /// The initiating action stays disabled until this holds.
    pub fn is_submittable(&self) -> bool {
        self.submission().is_some()
    }

    /// Produces the validated request payload, or `None` while the draft is
    /// missing its event date, location or tier selection.
    pub fn submission(&self) -> Option<BookingSubmission> {
        let event_date = self.event_date?;
        let tier_id = self.service_tier_price_id.clone()?;
        if self.location.trim().is_empty() {
            return None;
        }
        Some(BookingSubmission {
            service_id: self.service_id.clone(),
            service_tier_price_id: tier_id,
            selected_tier: self.selected_tier,
            event_date,
            location: self.location.clone(),
            attendees: self.attendees,
            special_requests: self.special_requests.clone(),
        })
    }
}

/// A booking draft that has passed validation; every field required by the
/// backend is present.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingSubmission {
    pub service_id: String,
    pub service_tier_price_id: String,
    pub selected_tier: Option<TierLevel>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub attendees: u32,
    pub special_requests: String,
}

/// Payment initiation payload sent after a booking is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: f64,
    pub vendor_id: String,
    pub booking_id: String,
    pub user_id: String,
}
