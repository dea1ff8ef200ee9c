use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Booking, BookingSubmission, Conversation, Payment, PaymentRequest};
use crate::domain::errors::ApiError;

/// Port for one browser-style key/value storage scope (durable or per-tab).
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Port for toast-style user notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
}

/// Port for client-side navigation, including full-page redirects out to
/// the payment gateway.
pub trait Navigator: Send + Sync {
    fn assign(&self, location: &str);
}

/// Port for the role-scoped conversation REST endpoints.
#[async_trait]
pub trait ConversationApi: Send + Sync {
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, ApiError>;
    async fn start_conversation(&self, counterpart_id: &str) -> Result<Conversation, ApiError>;
}

/// Port for the booking and payment REST endpoints.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn create_booking(&self, submission: &BookingSubmission) -> Result<Booking, ApiError>;
    /// Returns the external checkout URL on success.
    async fn initiate_payment(&self, request: &PaymentRequest) -> Result<String, ApiError>;
    async fn verify_payment(&self, tx_ref: &str, payment_id: &str) -> Result<Payment, ApiError>;
}
