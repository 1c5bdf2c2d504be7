//! surface-core: shared foundations for the attack surface meter.
//!
//! - Errors: one `thiserror` enum per subsystem, each with a structured code
//! - Config: TOML-based, layered resolution (overrides > env > project > defaults)
//! - Tracing: `tracing-subscriber` setup driven by `SURFACE_LOG`
//! - Types: collection re-exports used across the workspace

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;
