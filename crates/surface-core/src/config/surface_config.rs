//! Top-level configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Granularity, LoaderConfig, MetricsConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Caller overrides (applied via `apply_overrides`)
/// 2. Environment variables (`SURFACE_*`)
/// 3. Project config (`surface.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SurfaceConfig {
    pub loader: LoaderConfig,
    pub metrics: MetricsConfig,
}

/// Programmatic overrides, typically from command line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub loader_workers: Option<usize>,
    pub loader_timeout_ms: Option<u64>,
    pub granularity: Option<Granularity>,
    pub primary_weight: Option<f64>,
    pub secondary_weight: Option<f64>,
    pub damping: Option<f64>,
}

impl SurfaceConfig {
    /// Load configuration for the project rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: project config
        let project_config_path = root.join("surface.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): caller overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &SurfaceConfig) -> Result<(), ConfigError> {
        let loader = &config.loader;
        for (field, value) in [
            ("loader.workers", loader.workers),
            ("loader.work_queue", loader.work_queue),
            ("loader.result_queue", loader.result_queue),
        ] {
            if value == Some(0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }

        let metrics = &config.metrics;
        if let Some(damping) = metrics.damping {
            if !(damping > 0.0 && damping < 1.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "metrics.damping".to_string(),
                    message: "must be in (0.0, 1.0)".to_string(),
                });
            }
        }
        for (field, value) in [
            ("metrics.primary_weight", metrics.primary_weight),
            ("metrics.secondary_weight", metrics.secondary_weight),
            ("metrics.tolerance", metrics.tolerance),
        ] {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be a positive finite number".to_string(),
                    });
                }
            }
        }
        if metrics.max_iterations == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "metrics.max_iterations".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut SurfaceConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let file_config: SurfaceConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    fn merge(base: &mut SurfaceConfig, other: &SurfaceConfig) {
        let (b, o) = (&mut base.loader, &other.loader);
        b.workers = o.workers.or(b.workers);
        b.work_queue = o.work_queue.or(b.work_queue);
        b.result_queue = o.result_queue.or(b.result_queue);
        b.timeout_ms = o.timeout_ms.or(b.timeout_ms);
        b.granularity = o.granularity.or(b.granularity);
        if o.app_packages.is_some() {
            b.app_packages = o.app_packages.clone();
        }

        let (b, o) = (&mut base.metrics, &other.metrics);
        b.primary_weight = o.primary_weight.or(b.primary_weight);
        b.secondary_weight = o.secondary_weight.or(b.secondary_weight);
        b.damping = o.damping.or(b.damping);
        b.tolerance = o.tolerance.or(b.tolerance);
        b.max_iterations = o.max_iterations.or(b.max_iterations);
        b.cflow_call_weight = o.cflow_call_weight.or(b.cflow_call_weight);
        b.cflow_return_weight = o.cflow_return_weight.or(b.cflow_return_weight);
        b.gprof_call_weight = o.gprof_call_weight.or(b.gprof_call_weight);
        b.gprof_return_weight = o.gprof_return_weight.or(b.gprof_return_weight);
    }

    /// Apply environment variable overrides.
    /// Pattern: `SURFACE_LOADER_WORKERS`, `SURFACE_METRICS_DAMPING`, etc.
    ///
    /// Numeric values that fail to parse are ignored. An unknown granularity
    /// is rejected.
    fn apply_env_overrides(config: &mut SurfaceConfig) -> Result<(), ConfigError> {
        if let Some(v) = env_parse::<usize>("SURFACE_LOADER_WORKERS") {
            config.loader.workers = Some(v);
        }
        if let Some(v) = env_parse::<u64>("SURFACE_LOADER_TIMEOUT_MS") {
            config.loader.timeout_ms = Some(v);
        }
        if let Ok(val) = std::env::var("SURFACE_LOADER_GRANULARITY") {
            let granularity = val.parse::<Granularity>().map_err(|e| {
                ConfigError::InvalidValue {
                    field: "SURFACE_LOADER_GRANULARITY".to_string(),
                    message: e.to_string(),
                }
            })?;
            config.loader.granularity = Some(granularity);
        }
        if let Some(v) = env_parse::<f64>("SURFACE_METRICS_PRIMARY_WEIGHT") {
            config.metrics.primary_weight = Some(v);
        }
        if let Some(v) = env_parse::<f64>("SURFACE_METRICS_SECONDARY_WEIGHT") {
            config.metrics.secondary_weight = Some(v);
        }
        if let Some(v) = env_parse::<f64>("SURFACE_METRICS_DAMPING") {
            config.metrics.damping = Some(v);
        }
        Ok(())
    }

    /// Apply caller overrides (highest priority).
    fn apply_overrides(config: &mut SurfaceConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.loader_workers {
            config.loader.workers = Some(v);
        }
        if let Some(v) = overrides.loader_timeout_ms {
            config.loader.timeout_ms = Some(v);
        }
        if let Some(v) = overrides.granularity {
            config.loader.granularity = Some(v);
        }
        if let Some(v) = overrides.primary_weight {
            config.metrics.primary_weight = Some(v);
        }
        if let Some(v) = overrides.secondary_weight {
            config.metrics.secondary_weight = Some(v);
        }
        if let Some(v) = overrides.damping {
            config.metrics.damping = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
