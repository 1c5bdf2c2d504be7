//! Proximity of nodes to the entry and exit surfaces.

use petgraph::Direction;
use surface_core::errors::CallGraphError;
use surface_core::types::collections::FxHashMap;

use super::{SurfaceKind, SurfaceMetrics};
use crate::call::Call;
use crate::call_graph::CallGraph;

impl CallGraph {
    /// Hop distance between `call` and every surface point it is connected
    /// to: from an entry point to `call`, or from `call` to an exit point.
    /// Empty when `call` is itself on the surface.
    pub fn get_shortest_path_length(
        &self,
        call: &Call,
        kind: SurfaceKind,
    ) -> Result<FxHashMap<Call, usize>, CallGraphError> {
        let start = self.require(call)?;
        let attribute = kind.attribute();
        if self.node_attrs(call).is_some_and(|attrs| attrs.has(attribute)) {
            return Ok(FxHashMap::default());
        }

        let direction = match kind {
            SurfaceKind::Entry => Direction::Incoming,
            SurfaceKind::Exit => Direction::Outgoing,
        };
        Ok(self
            .distances(start, direction)
            .into_iter()
            .filter(|&(index, _)| index != start)
            .filter_map(|(index, distance)| {
                let node = self.graph.node_weight(index)?;
                node.attrs
                    .has(attribute)
                    .then(|| (node.call.clone(), distance))
            })
            .collect())
    }

    pub fn get_surface_metrics(
        &self,
        call: &Call,
        kind: SurfaceKind,
    ) -> Result<SurfaceMetrics, CallGraphError> {
        self.require(call)?;
        if self
            .node_attrs(call)
            .is_some_and(|attrs| attrs.has(kind.attribute()))
        {
            return Ok(SurfaceMetrics {
                points: None,
                proximity: Some(0.0),
                surface_coupling: None,
            });
        }

        let lengths = self.get_shortest_path_length(call, kind)?;
        if lengths.is_empty() {
            return Ok(SurfaceMetrics::default());
        }

        let total: usize = lengths.values().sum();
        let proximity = total as f64 / lengths.len() as f64;
        let mut points: Vec<Call> = lengths.into_keys().collect();
        points.sort();
        Ok(SurfaceMetrics {
            surface_coupling: Some(points.len()),
            proximity: Some(proximity),
            points: Some(points),
        })
    }

    pub fn get_entry_surface_metrics(&self, call: &Call) -> Result<SurfaceMetrics, CallGraphError> {
        self.get_surface_metrics(call, SurfaceKind::Entry)
    }

    pub fn get_exit_surface_metrics(&self, call: &Call) -> Result<SurfaceMetrics, CallGraphError> {
        self.get_surface_metrics(call, SurfaceKind::Exit)
    }
}
