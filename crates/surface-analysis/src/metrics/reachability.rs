//! Reachability from entry points and to exit points.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use petgraph::Direction;
use surface_core::errors::CallGraphError;
use surface_core::types::collections::{FxHashMap, FxHashSet};

use crate::call::Call;
use crate::call_graph::CallGraph;

impl CallGraph {
    /// Hop distance from `start` to every node it reaches following edges in
    /// `direction`. `start` itself is at distance 0.
    pub(crate) fn distances(
        &self,
        start: NodeIndex,
        direction: Direction,
    ) -> FxHashMap<NodeIndex, usize> {
        let mut distances = FxHashMap::default();
        distances.insert(start, 0);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            let next = distances[&node] + 1;
            for neighbor in self.graph.neighbors_directed(node, direction) {
                if !distances.contains_key(&neighbor) {
                    distances.insert(neighbor, next);
                    queue.push_back(neighbor);
                }
            }
        }
        distances
    }

    fn reachable(&self, call: &Call, direction: Direction) -> Result<Vec<Call>, CallGraphError> {
        let start = self.require(call)?;
        let mut calls: Vec<Call> = self
            .distances(start, direction)
            .into_keys()
            .filter(|&index| index != start)
            .filter_map(|index| self.call_at(index).cloned())
            .collect();
        calls.sort();
        Ok(calls)
    }

    /// Nodes reachable from `call`, excluding `call`.
    pub fn get_descendants(&self, call: &Call) -> Result<Vec<Call>, CallGraphError> {
        self.reachable(call, Direction::Outgoing)
    }

    /// Nodes from which `call` is reachable, excluding `call`.
    pub fn get_ancestors(&self, call: &Call) -> Result<Vec<Call>, CallGraphError> {
        self.reachable(call, Direction::Incoming)
    }

    /// Share of the graph reachable from the entry point `call`.
    pub fn get_entry_point_reachability(&self, call: &Call) -> Result<f64, CallGraphError> {
        if !self.node_attrs(call).is_some_and(|attrs| attrs.entry) {
            return Err(CallGraphError::NotAnEntryPoint {
                call: call.to_string(),
            });
        }
        Ok(self.get_descendants(call)?.len() as f64 / self.num_nodes() as f64)
    }

    /// Share of the graph that reaches the exit point `call`.
    pub fn get_exit_point_reachability(&self, call: &Call) -> Result<f64, CallGraphError> {
        if !self.node_attrs(call).is_some_and(|attrs| attrs.exit) {
            return Err(CallGraphError::NotAnExitPoint {
                call: call.to_string(),
            });
        }
        Ok(self.get_ancestors(call)?.len() as f64 / self.num_nodes() as f64)
    }

    /// Entry points and their descendants plus exit points and their
    /// ancestors, sorted.
    pub fn attack_surface_nodes(&self) -> Vec<Call> {
        let mut surface: FxHashSet<NodeIndex> = FxHashSet::default();
        for (attribute, direction) in [("entry", Direction::Outgoing), ("exit", Direction::Incoming)] {
            for call in self.get_nodes(attribute) {
                if let Some(start) = self.index_of(&call) {
                    surface.extend(self.distances(start, direction).into_keys());
                }
            }
        }
        let mut calls: Vec<Call> = surface
            .into_iter()
            .filter_map(|index| self.call_at(index).cloned())
            .collect();
        calls.sort();
        calls
    }
}
