use std::{env, time::Duration};

// Runtime constants and environment-driven settings.

pub fn api_url() -> String {
    env::var("MARKETPLACE_API_URL").unwrap_or_else(|_| "http://localhost:5000/api".to_string())
}

// Fixed per-request ceiling; timeouts surface as generic transport failures.
pub fn request_timeout() -> Duration {
    let millis = env::var("MARKETPLACE_REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}

pub const COMMAND_CHANNEL_CAPACITY: usize = 64;
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

// Verification cadence while a payment stays PENDING.
pub const PAYMENT_POLL_INTERVAL: Duration = Duration::from_secs(5);
// Delay before the compensating redirect when payment initiation fails.
pub const PAYMENT_FAILURE_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub const LOGIN_ROUTE: &str = "/login";
pub const BOOKINGS_ROUTE: &str = "/dashboard/my-bookings";
