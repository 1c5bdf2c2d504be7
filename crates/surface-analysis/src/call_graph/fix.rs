//! Signature reconciliation between two graphs of the same program.
//!
//! A profile often knows only a function's name while the static graph
//! knows name and file. Before a union, each name-only node is rewritten
//! to carry the signature of its single namesake in the other graph.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use surface_core::types::collections::FxHashMap;
use tracing::debug;

use super::types::{CallGraph, EdgeAttrs};
use crate::call::Call;

impl CallGraph {
    /// Rewrite name-only nodes using `reference`. A node is rewritten only
    /// when `reference` holds exactly one node with the same name and that
    /// node has a signature; otherwise it is left unchanged.
    ///
    /// Returns the number of rewritten nodes.
    pub fn fix(&mut self, reference: &CallGraph) -> usize {
        let mut by_name: FxHashMap<&str, Vec<&Call>> = FxHashMap::default();
        for call in reference.calls() {
            if !call.name().is_empty() {
                by_name.entry(call.name()).or_default().push(call);
            }
        }

        let targets: Vec<Call> = self
            .calls()
            .filter(|call| call.is_function_name_only() && !call.name().is_empty())
            .cloned()
            .collect();

        let mut fixed = 0;
        for call in targets {
            match by_name.get(call.name()).map(Vec::as_slice) {
                Some([candidate]) if !candidate.is_function_name_only() => {
                    let renamed = call.with_signature(candidate.signature());
                    self.rename_node(&call, renamed);
                    fixed += 1;
                }
                Some(candidates) if candidates.len() > 1 => {
                    debug!(
                        call = %call,
                        candidates = candidates.len(),
                        "ambiguous signature fix, node left unchanged"
                    );
                }
                _ => {}
            }
        }
        fixed
    }

    /// Move node `from` to identity `to`, carrying its attributes and
    /// incident edges. If `to` already exists the two nodes are merged.
    pub(crate) fn rename_node(&mut self, from: &Call, to: Call) {
        let Some(old) = self.index_of(from) else {
            return;
        };
        let outgoing = self.incident_edges(old, Direction::Outgoing);
        let incoming = self.incident_edges(old, Direction::Incoming);

        let Some(attrs) = self.remove_node(from) else {
            return;
        };
        let new = self.add_node(to, attrs);

        for (target, attrs) in outgoing {
            let target = if target == old { new } else { target };
            self.add_edge_between(new, target, attrs);
        }
        for (source, attrs) in incoming {
            // Self-loops were carried over with the outgoing edges.
            if source != old {
                self.add_edge_between(source, new, attrs);
            }
        }
    }

    fn incident_edges(&self, index: NodeIndex, direction: Direction) -> Vec<(NodeIndex, EdgeAttrs)> {
        self.graph
            .edges_directed(index, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (other, edge.weight().clone())
            })
            .collect()
    }
}
