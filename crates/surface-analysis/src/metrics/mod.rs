//! Metrics engine: reachability, surface proximity, degree, edge weights,
//! and personalized PageRank.
//!
//! All passes are `impl CallGraph` blocks. Read-only passes never change
//! topology; `assign_weights` and `assign_page_rank` only write attributes.

pub mod degree;
pub mod page_rank;
pub mod reachability;
pub mod surface;
pub mod weights;

use serde::Serialize;
use surface_core::config::MetricsConfig;

use crate::call::Call;

/// Which attack surface a metric is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SurfaceKind {
    /// Paths from an entry point to the node.
    Entry,
    /// Paths from the node to an exit point.
    Exit,
}

impl SurfaceKind {
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }
}

/// Proximity of one node to a surface.
///
/// A node on the surface itself has `proximity == Some(0.0)` and no points.
/// A node with no path to (or from) the surface has everything `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurfaceMetrics {
    /// Surface nodes connected to the node, sorted by identity.
    pub points: Option<Vec<Call>>,
    /// Mean shortest path length to those points.
    pub proximity: Option<f64>,
    /// Number of connected surface points.
    pub surface_coupling: Option<usize>,
}

/// Edge weights written by `assign_weights`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeWeights {
    pub cflow_call: u32,
    pub cflow_return: u32,
    pub gprof_call: u32,
    pub gprof_return: u32,
}

impl Default for EdgeWeights {
    fn default() -> Self {
        Self::from_config(&MetricsConfig::default())
    }
}

impl EdgeWeights {
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self {
            cflow_call: config.effective_cflow_call_weight(),
            cflow_return: config.effective_cflow_return_weight(),
            gprof_call: config.effective_gprof_call_weight(),
            gprof_return: config.effective_gprof_return_weight(),
        }
    }
}

/// Parameters of the personalized PageRank power iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageRankParams {
    /// Personalization of entry and exit points.
    pub primary: f64,
    /// Personalization of every other node.
    pub secondary: f64,
    pub damping: f64,
    /// Convergence threshold on the L1 change between iterations.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for PageRankParams {
    fn default() -> Self {
        Self::from_config(&MetricsConfig::default())
    }
}

impl PageRankParams {
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self {
            primary: config.effective_primary_weight(),
            secondary: config.effective_secondary_weight(),
            damping: config.effective_damping(),
            tolerance: config.effective_tolerance(),
            max_iterations: config.effective_max_iterations(),
        }
    }

    pub fn with_weights(mut self, primary: f64, secondary: f64) -> Self {
        self.primary = primary;
        self.secondary = secondary;
        self
    }
}
