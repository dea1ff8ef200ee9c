// Shared doubles for unit and integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Booking, BookingStatus, BookingSubmission, Conversation, Message, Participant, Payment,
    PaymentRequest, PaymentStatus, Role,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::{BookingApi, Clock, ConversationApi, Navigator, Notifier};

pub fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid fixed timestamp")
}

// Fixed time source so timestamp assertions are deterministic.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// Tests use the shipped in-memory scope as their storage double.
pub use crate::interface_adapters::storage::InMemoryStorage as MemoryStorage;

// Captures toast notifications for assertions.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages_of(&self, level: &str) -> Vec<String> {
        let guard = self.events.lock().expect("notifier mutex poisoned");
        guard
            .iter()
            .filter(|(kind, _)| kind == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn record(&self, level: &str, message: &str) {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push((level.to_string(), message.to_string()));
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.record("success", message);
    }

    fn error(&self, message: &str) {
        self.record("error", message);
    }

    fn info(&self, message: &str) {
        self.record("info", message);
    }
}

// Captures navigation targets for assertions.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    visits: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        let guard = self.visits.lock().expect("navigator mutex poisoned");
        guard.clone()
    }
}

impl Navigator for RecordingNavigator {
    fn assign(&self, location: &str) {
        let mut guard = self.visits.lock().expect("navigator mutex poisoned");
        guard.push(location.to_string());
    }
}

pub fn test_participant(user_id: &str, role: Role) -> Participant {
    Participant {
        id: format!("part-{user_id}"),
        user_id: user_id.to_string(),
        role,
        display_name: user_id.to_string(),
    }
}

pub fn test_message(
    conversation_id: &str,
    sender_id: &str,
    recipient_id: &str,
    content: &str,
    created_at: DateTime<Utc>,
) -> Message {
    Message {
        id: format!("msg-{sender_id}-{content}"),
        conversation_id: conversation_id.to_string(),
        sender_id: sender_id.to_string(),
        recipient_id: recipient_id.to_string(),
        content: content.to_string(),
        created_at,
        read: false,
        client_ref: None,
        optimistic: false,
    }
}

pub fn test_conversation(id: &str, me: &str, counterpart: &str) -> Conversation {
    Conversation {
        id: id.to_string(),
        participants: vec![
            test_participant(me, Role::Client),
            test_participant(counterpart, Role::Vendor),
        ],
        messages: Vec::new(),
        unread_count: 0,
        last_activity: fixed_time(),
    }
}

#[derive(Clone, Copy, Default)]
pub struct ConversationFailures {
    pub fetch: bool,
    pub start: bool,
}

// Conversation endpoint double that acts as a tiny in-memory backend.
#[derive(Clone)]
pub struct RecordingConversationApi {
    me: String,
    conversations: Arc<Mutex<Vec<Conversation>>>,
    failures: ConversationFailures,
    fetch_calls: Arc<AtomicU32>,
    start_calls: Arc<AtomicU32>,
}

impl RecordingConversationApi {
    pub fn new(me: &str) -> Self {
        Self {
            me: me.to_string(),
            conversations: Arc::new(Mutex::new(Vec::new())),
            failures: ConversationFailures::default(),
            fetch_calls: Arc::new(AtomicU32::new(0)),
            start_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn with_failures(mut self, failures: ConversationFailures) -> Self {
        self.failures = failures;
        self
    }

    pub fn seed(&self, conversation: Conversation) {
        let mut guard = self.conversations.lock().expect("conversations poisoned");
        guard.push(conversation);
    }

    pub fn fetch_calls(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> u32 {
        self.start_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversationApi for RecordingConversationApi {
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.fetch {
            return Err(ApiError::Transport("fetch failed".to_string()));
        }
        let guard = self.conversations.lock().expect("conversations poisoned");
        Ok(guard.clone())
    }

    async fn start_conversation(&self, counterpart_id: &str) -> Result<Conversation, ApiError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.start {
            return Err(ApiError::Upstream {
                status: 500,
                message: Some("could not create conversation".to_string()),
            });
        }
        let conversation = test_conversation(&format!("conv-{counterpart_id}"), &self.me, counterpart_id);
        let mut guard = self.conversations.lock().expect("conversations poisoned");
        guard.push(conversation.clone());
        Ok(conversation)
    }
}

pub fn test_payment(status: PaymentStatus) -> Payment {
    Payment {
        id: "payment-1".to_string(),
        booking_id: "booking-1".to_string(),
        vendor_id: "vendor-1".to_string(),
        user_id: "user-1".to_string(),
        amount: 2_500.0,
        status,
        tx_ref: "tx-1".to_string(),
    }
}

pub fn test_booking(submission: &BookingSubmission) -> Booking {
    Booking {
        id: "booking-1".to_string(),
        service_id: submission.service_id.clone(),
        service_tier_price_id: Some(submission.service_tier_price_id.clone()),
        selected_tier: submission.selected_tier,
        event_date: submission.event_date,
        location: submission.location.clone(),
        attendees: submission.attendees,
        special_requests: submission.special_requests.clone(),
        status: BookingStatus::Pending,
        vendor_id: "vendor-1".to_string(),
        tier: None,
        amount: None,
    }
}

#[derive(Clone, Copy, Default)]
pub struct BookingFailures {
    pub create: bool,
    pub initiate: bool,
}

// Booking endpoint double with a scriptable verification sequence.
#[derive(Clone)]
pub struct RecordingBookingApi {
    checkout_url: String,
    failures: BookingFailures,
    created: Arc<Mutex<Vec<BookingSubmission>>>,
    payment_requests: Arc<Mutex<Vec<PaymentRequest>>>,
    verify_script: Arc<Mutex<VecDeque<Result<Payment, ApiError>>>>,
    verify_calls: Arc<AtomicU32>,
}

impl RecordingBookingApi {
    pub fn new() -> Self {
        Self {
            checkout_url: "https://checkout.chapa.test/pay/tx-1".to_string(),
            failures: BookingFailures::default(),
            created: Arc::new(Mutex::new(Vec::new())),
            payment_requests: Arc::new(Mutex::new(Vec::new())),
            verify_script: Arc::new(Mutex::new(VecDeque::new())),
            verify_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn with_failures(mut self, failures: BookingFailures) -> Self {
        self.failures = failures;
        self
    }

    pub fn script_verification(&self, results: Vec<Result<Payment, ApiError>>) {
        let mut guard = self.verify_script.lock().expect("script poisoned");
        guard.extend(results);
    }

    pub fn created(&self) -> Vec<BookingSubmission> {
        self.created.lock().expect("created poisoned").clone()
    }

    pub fn payment_requests(&self) -> Vec<PaymentRequest> {
        self.payment_requests
            .lock()
            .expect("payment requests poisoned")
            .clone()
    }

    pub fn verify_calls(&self) -> u32 {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

impl Default for RecordingBookingApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingApi for RecordingBookingApi {
    async fn create_booking(&self, submission: &BookingSubmission) -> Result<Booking, ApiError> {
        if self.failures.create {
            return Err(ApiError::Upstream {
                status: 422,
                message: Some("service is unavailable on that date".to_string()),
            });
        }
        let mut guard = self.created.lock().expect("created poisoned");
        guard.push(submission.clone());
        Ok(test_booking(submission))
    }

    async fn initiate_payment(&self, request: &PaymentRequest) -> Result<String, ApiError> {
        if self.failures.initiate {
            return Err(ApiError::Upstream {
                status: 502,
                message: Some("payment gateway unavailable".to_string()),
            });
        }
        let mut guard = self.payment_requests.lock().expect("payment requests poisoned");
        guard.push(request.clone());
        Ok(self.checkout_url.clone())
    }

    async fn verify_payment(&self, _tx_ref: &str, _payment_id: &str) -> Result<Payment, ApiError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.verify_script.lock().expect("script poisoned");
        guard
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("verification script exhausted".to_string())))
    }
}
