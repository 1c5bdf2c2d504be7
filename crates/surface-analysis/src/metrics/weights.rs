//! Edge weights from provenance.
//!
//! Forward edges weigh more than their return edges, and profile-observed
//! edges weigh less than static-only ones. An edge that is both a call and
//! a return (mutual recursion) is weighted as a call.

use tracing::debug;

use super::EdgeWeights;
use crate::call_graph::{CallGraph, EdgeAttrs};

impl EdgeWeights {
    pub fn weight_for(&self, attrs: &EdgeAttrs) -> u32 {
        match (attrs.is_call, attrs.gprof) {
            (true, true) => self.gprof_call,
            (true, false) => self.cflow_call,
            (false, true) if attrs.is_return => self.gprof_return,
            (false, false) if attrs.is_return => self.cflow_return,
            _ => self.cflow_call,
        }
    }
}

impl CallGraph {
    /// Write a `weight` on every edge, replacing any previous weight.
    pub fn assign_weights(&mut self, weights: &EdgeWeights) {
        let mut assigned = 0usize;
        for attrs in self.graph.edge_weights_mut() {
            attrs.weight = Some(weights.weight_for(attrs));
            assigned += 1;
        }
        debug!(assigned, "edge weights assigned");
    }
}
