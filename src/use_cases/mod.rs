// Use cases layer: session vault, conversation store and the
// booking/payment flows.

pub mod booking;
pub mod conversations;
pub mod payment_status;
pub mod session;
// Recording doubles shared by unit and integration tests.
pub mod test_support;

pub use booking::BookingFlow;
pub use conversations::{ChannelCommand, ConversationStore, ConversationTarget};
pub use payment_status::PaymentStatusPoller;
pub use session::SessionVault;
