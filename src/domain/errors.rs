// Domain-level errors for marketplace client workflows.

use std::fmt;

/// Failure of a REST call, as seen by callers of the service façades.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // Connection-level failure, including the fixed request timeout.
    Transport(String),
    // HTTP 401; the session has already been cleared by the time callers
    // observe this variant.
    Unauthorized,
    // Non-2xx response with the upstream status and optional message.
    Upstream { status: u16, message: Option<String> },
    // 2xx body that did not match the expected shape.
    Decode(String),
}

impl ApiError {
    /// Backend-provided message, used to prefer upstream wording in toasts.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            ApiError::Upstream {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "transport error: {err}"),
            ApiError::Unauthorized => write!(f, "unauthorized"),
            ApiError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "upstream error {status}: {message}")
                } else {
                    write!(f, "upstream error {status}")
                }
            }
            ApiError::Decode(err) => write!(f, "response decode error: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors surfaced by the conversation store.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatError {
    // Send/select operations require a focused conversation.
    NoActiveConversation,
    // The focused conversation has no participant besides the session user.
    MissingCounterpart,
    Api(ApiError),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::NoActiveConversation => write!(f, "no active conversation"),
            ChatError::MissingCounterpart => write!(f, "conversation has no counterpart"),
            ChatError::Api(err) => write!(f, "conversation request failed: {err}"),
        }
    }
}

impl std::error::Error for ChatError {}

/// Errors surfaced by the booking/payment pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingError {
    // Draft validation failed; no network call was made.
    IncompleteDraft,
    // No session user id available for the payment payload.
    MissingSession,
    // Booking creation failed; payment was never initiated.
    Booking(ApiError),
    // Booking exists but payment initiation or verification failed.
    Payment(ApiError),
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::IncompleteDraft => write!(f, "booking draft is incomplete"),
            BookingError::MissingSession => write!(f, "no active session"),
            BookingError::Booking(err) => write!(f, "booking creation failed: {err}"),
            BookingError::Payment(err) => write!(f, "payment step failed: {err}"),
        }
    }
}

impl std::error::Error for BookingError {}
