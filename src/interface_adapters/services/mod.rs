// Role-scoped façades over the REST client.

pub mod admin;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod vendor;

pub use admin::AdminGateway;
pub use auth::AuthService;
pub use client::ClientService;
pub use dashboard::DashboardService;
pub use vendor::VendorService;
