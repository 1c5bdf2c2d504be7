//! Metrics configuration.

use serde::{Deserialize, Serialize};

/// Configuration for edge weights and page rank.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MetricsConfig {
    /// Personalization value for entry/exit points. Default: 10000.
    pub primary_weight: Option<f64>,
    /// Personalization value for every other node. Default: 1.
    pub secondary_weight: Option<f64>,
    /// Page rank damping factor. Default: 0.85.
    pub damping: Option<f64>,
    /// L1 convergence tolerance. Default: 1e-6.
    pub tolerance: Option<f64>,
    /// Page rank iteration cap. Default: 100.
    pub max_iterations: Option<usize>,
    /// Weight of a cflow call edge. Default: 100.
    pub cflow_call_weight: Option<u32>,
    /// Weight of a cflow return edge. Default: 50.
    pub cflow_return_weight: Option<u32>,
    /// Weight of a gprof call edge. Default: 75.
    pub gprof_call_weight: Option<u32>,
    /// Weight of a gprof return edge. Default: 25.
    pub gprof_return_weight: Option<u32>,
}

impl MetricsConfig {
    pub fn effective_primary_weight(&self) -> f64 {
        self.primary_weight.unwrap_or(10_000.0)
    }

    pub fn effective_secondary_weight(&self) -> f64 {
        self.secondary_weight.unwrap_or(1.0)
    }

    pub fn effective_damping(&self) -> f64 {
        self.damping.unwrap_or(0.85)
    }

    pub fn effective_tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(1e-6)
    }

    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations.unwrap_or(100)
    }

    pub fn effective_cflow_call_weight(&self) -> u32 {
        self.cflow_call_weight.unwrap_or(100)
    }

    pub fn effective_cflow_return_weight(&self) -> u32 {
        self.cflow_return_weight.unwrap_or(50)
    }

    pub fn effective_gprof_call_weight(&self) -> u32 {
        self.gprof_call_weight.unwrap_or(75)
    }

    pub fn effective_gprof_return_weight(&self) -> u32 {
        self.gprof_return_weight.unwrap_or(25)
    }
}
