// Framework layer: runtime configuration and telemetry bootstrap.

pub mod config;
pub mod telemetry;
