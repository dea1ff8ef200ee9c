pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config;
pub use frameworks::telemetry::init_tracing;
