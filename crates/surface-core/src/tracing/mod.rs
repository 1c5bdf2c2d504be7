//! Observability for the attack surface meter.
//! `tracing` crate with `EnvFilter`, per-subsystem log levels.

pub mod metrics;
pub mod setup;

pub use setup::{env_filter, init_tracing, DEFAULT_FILTER};
