// Interface adapters: REST client, wire protocol, realtime channel and
// default port implementations.

pub mod endpoints;
pub mod http;
pub mod protocol;
pub mod registry;
pub mod services;
pub mod socket;
pub mod storage;

pub use http::RestClient;
pub use socket::{ChannelState, RealtimeChannel, RealtimeConfig};
