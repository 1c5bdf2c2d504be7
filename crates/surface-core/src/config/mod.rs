//! Configuration system for the attack surface meter.
//! TOML-based, layered resolution: overrides > env > project > defaults.

pub mod loader_config;
pub mod metrics_config;
pub mod surface_config;

pub use loader_config::{Granularity, LoaderConfig};
pub use metrics_config::MetricsConfig;
pub use surface_config::{ConfigOverrides, SurfaceConfig};
