//! Personalized PageRank by power iteration.
//!
//! Teleportation and dangling mass both follow the personalization vector,
//! which favors entry and exit points. Edge `weight`s bias the walk; an
//! unweighted edge counts as 1.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use surface_core::errors::CallGraphError;
use surface_core::tracing::metrics as fields;
use surface_core::types::collections::FxHashMap;
use tracing::{debug, warn};

use super::PageRankParams;
use crate::call::Call;
use crate::call_graph::CallGraph;

impl CallGraph {
    fn page_rank_vector(&self, params: &PageRankParams) -> Vec<(NodeIndex, f64)> {
        let nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        let n = nodes.len();
        if n == 0 {
            return Vec::new();
        }
        let position: FxHashMap<NodeIndex, usize> =
            nodes.iter().enumerate().map(|(i, &index)| (index, i)).collect();

        let mut personalization: Vec<f64> = nodes
            .iter()
            .map(|&index| match self.graph.node_weight(index) {
                Some(node) if node.attrs.entry || node.attrs.exit => params.primary,
                _ => params.secondary,
            })
            .collect();
        let total: f64 = personalization.iter().sum();
        if total > 0.0 && total.is_finite() {
            personalization.iter_mut().for_each(|p| *p /= total);
        } else {
            personalization.iter_mut().for_each(|p| *p = 1.0 / n as f64);
        }

        // Row-normalized out-edges.
        let links: Vec<Vec<(usize, f64)>> = nodes
            .iter()
            .map(|&index| {
                let out: Vec<(usize, f64)> = self
                    .graph
                    .edges(index)
                    .map(|edge| {
                        let weight = edge.weight().weight.map_or(1.0, f64::from);
                        (position[&edge.target()], weight)
                    })
                    .collect();
                let sum: f64 = out.iter().map(|(_, w)| w).sum();
                if sum > 0.0 {
                    out.into_iter().map(|(t, w)| (t, w / sum)).collect()
                } else {
                    Vec::new()
                }
            })
            .collect();

        let alpha = params.damping;
        let mut rank = vec![1.0 / n as f64; n];
        let mut converged = false;
        let mut iterations = 0;

        while iterations < params.max_iterations {
            iterations += 1;
            let dangling: f64 = links
                .iter()
                .zip(&rank)
                .filter(|(out, _)| out.is_empty())
                .map(|(_, r)| r)
                .sum();

            let mut next: Vec<f64> = personalization
                .iter()
                .map(|p| (alpha * dangling + (1.0 - alpha)) * p)
                .collect();
            for (source, out) in links.iter().enumerate() {
                for &(target, share) in out {
                    next[target] += alpha * rank[source] * share;
                }
            }

            let change: f64 = next.iter().zip(&rank).map(|(a, b)| (a - b).abs()).sum();
            rank = next;
            if change < params.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            debug!({ fields::PAGE_RANK_ITERATIONS } = iterations, "page rank converged");
        } else {
            warn!(
                { fields::PAGE_RANK_ITERATIONS } = iterations,
                "page rank did not converge, using last iterate"
            );
        }
        nodes.into_iter().zip(rank).collect()
    }

    /// PageRank of every node. Scores sum to 1.
    pub fn get_page_rank(&self, params: &PageRankParams) -> FxHashMap<Call, f64> {
        self.page_rank_vector(params)
            .into_iter()
            .filter_map(|(index, rank)| Some((self.call_at(index)?.clone(), rank)))
            .collect()
    }

    pub fn get_page_rank_of(
        &self,
        call: &Call,
        params: &PageRankParams,
    ) -> Result<f64, CallGraphError> {
        self.require(call)?;
        self.get_page_rank(params)
            .remove(call)
            .ok_or_else(|| CallGraphError::NodeNotFound {
                call: call.to_string(),
            })
    }

    /// Store each node's PageRank as the score `name`.
    pub fn assign_page_rank(&mut self, params: &PageRankParams, name: &str) {
        for (index, rank) in self.page_rank_vector(params) {
            if let Some(node) = self.graph.node_weight_mut(index) {
                node.attrs.scores.insert(name.to_string(), rank);
            }
        }
    }
}
