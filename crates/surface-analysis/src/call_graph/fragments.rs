//! Fragmentation into strongly connected components.

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use surface_core::types::collections::FxHashSet;
use tracing::info;

use super::types::CallGraph;
use crate::call::Call;

impl CallGraph {
    /// Strongly connected components, each as a list of calls.
    pub fn get_fragments(&self) -> Vec<Vec<Call>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .map(|component| {
                component
                    .into_iter()
                    .filter_map(|index| self.call_at(index).cloned())
                    .collect()
            })
            .collect()
    }

    /// Replace the graph by its largest strongly connected component and
    /// record `num_fragments` and `monolithicity`. Ties go to the component
    /// found first. An empty graph is left untouched.
    pub fn fragmentize(&mut self) {
        let components = tarjan_scc(&self.graph);
        if components.is_empty() {
            return;
        }

        let original = self.num_nodes();
        let mut largest = 0;
        for (i, component) in components.iter().enumerate() {
            if component.len() > components[largest].len() {
                largest = i;
            }
        }
        let keep: FxHashSet<NodeIndex> = components[largest].iter().copied().collect();

        let doomed: Vec<Call> = self
            .graph
            .node_indices()
            .filter(|index| !keep.contains(index))
            .filter_map(|index| self.call_at(index).cloned())
            .collect();
        for call in &doomed {
            self.remove_node(call);
        }

        self.num_fragments = Some(components.len());
        self.monolithicity = Some(keep.len() as f64 / original as f64);
        info!(
            fragments = components.len(),
            kept = keep.len(),
            original,
            "call graph fragmented"
        );
    }
}
