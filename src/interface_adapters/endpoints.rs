// Canonical REST endpoint paths, resolved per role by exhaustive match.

use crate::domain::entities::Role;

pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_REGISTER: &str = "/auth/register";
pub const AUTH_VALIDATE: &str = "/auth/validate";

pub const VENDOR_REGISTER: &str = "/vendors/register";
pub const VENDOR_SERVICES: &str = "/vendor/services";
pub const VENDOR_DASHBOARD: &str = "/vendor/dashboard/overview";
pub const VENDOR_BOOKINGS: &str = "/vendor/bookings";
pub const VENDOR_CONVERSATIONS: &str = "/vendor/conversations";
pub const VENDOR_PAYMENTS: &str = "/vendor/payment";
pub const VENDOR_ACCOUNT_PROFILE: &str = "/vendor/account/profile";

pub const CLIENT_DASHBOARD: &str = "/client/dashboard";
pub const CLIENT_BOOKINGS: &str = "/client/bookings";
pub const CLIENT_PAYMENTS: &str = "/client/payment";
pub const CLIENT_PAYMENT_INITIATE: &str = "/client/payment/initiate";
pub const CLIENT_PAYMENT_VERIFY: &str = "/client/payment/verify";
pub const CLIENT_ACCOUNT_PROFILE: &str = "/client/account/profile";
pub const CLIENT_SERVICES: &str = "/client/services";
pub const CLIENT_CONVERSATIONS: &str = "/client/conversations";
pub const CLIENT_START_CONVERSATION: &str = "/client/conversation";

pub const DASHBOARD_STATS: &str = "/dashboard/stats";
pub const DASHBOARD_BOOKINGS: &str = "/dashboard/bookings";
pub const DASHBOARD_EVENTS: &str = "/dashboard/events";
pub const DASHBOARD_NOTIFICATIONS: &str = "/dashboard/notifications";

/// Root prefix for role-scoped resources.
pub fn role_prefix(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::EventPlanner => "/eventplanner",
        Role::Vendor => "/vendor",
        Role::Client => "/client",
    }
}

/// Conversation list endpoint for roles that carry the messaging feature.
pub fn conversations_path(role: Role) -> Option<&'static str> {
    match role {
        Role::Vendor => Some(VENDOR_CONVERSATIONS),
        Role::Client => Some(CLIENT_CONVERSATIONS),
        Role::Admin | Role::EventPlanner => None,
    }
}

/// Conversation create endpoint. The client side posts to the singular
/// `/client/conversation` path; the vendor side reuses its list path.
pub fn start_conversation_path(role: Role) -> Option<&'static str> {
    match role {
        Role::Vendor => Some(VENDOR_CONVERSATIONS),
        Role::Client => Some(CLIENT_START_CONVERSATION),
        Role::Admin | Role::EventPlanner => None,
    }
}
