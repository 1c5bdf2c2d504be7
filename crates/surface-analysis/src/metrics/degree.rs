//! Degree over all edges, fan over call edges only.

use petgraph::Direction;
use surface_core::errors::CallGraphError;
use surface_core::types::collections::FxHashMap;

use crate::call::Call;
use crate::call_graph::CallGraph;

impl CallGraph {
    /// `(in_degree, out_degree)` counting call and return edges.
    pub fn get_degree(&self, call: &Call) -> Result<(usize, usize), CallGraphError> {
        let index = self.require(call)?;
        Ok((
            self.graph.edges_directed(index, Direction::Incoming).count(),
            self.graph.edges_directed(index, Direction::Outgoing).count(),
        ))
    }

    pub fn get_degrees(&self) -> FxHashMap<Call, (usize, usize)> {
        self.calls()
            .filter_map(|call| Some((call.clone(), self.get_degree(call).ok()?)))
            .collect()
    }

    /// `(fan_in, fan_out)` counting call edges only.
    pub fn get_fan(&self, call: &Call) -> Result<(usize, usize), CallGraphError> {
        let index = self.require(call)?;
        let calls = |direction: Direction| {
            self.graph
                .edges_directed(index, direction)
                .filter(|edge| edge.weight().is_call)
                .count()
        };
        Ok((calls(Direction::Incoming), calls(Direction::Outgoing)))
    }

    pub fn get_fans(&self) -> FxHashMap<Call, (usize, usize)> {
        self.calls()
            .filter_map(|call| Some((call.clone(), self.get_fan(call).ok()?)))
            .collect()
    }
}
