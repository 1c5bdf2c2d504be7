//! The `Call` node model and the standard-library classification registry.

pub mod stdlib;
pub mod types;

pub use surface_core::config::Granularity;
pub use types::{Call, Environment};
