//! Call graph construction: from a loader, or by merging two graphs.

use std::time::Instant;

use surface_core::errors::LoadError;
use surface_core::tracing::metrics as fields;
use tracing::info;

use super::types::CallGraph;
use crate::loaders::Loader;

impl CallGraph {
    /// Run `loader` and wrap its output. Parse errors are kept on the graph.
    pub fn from_loader(loader: &dyn Loader, fragmentize: bool) -> Result<Self, LoadError> {
        let start = Instant::now();
        let output = loader.load()?;

        let mut graph = output.graph;
        graph.source = loader.source();
        graph.errors = output.errors;
        if fragmentize {
            graph.fragmentize();
        }

        info!(
            source = %graph.source,
            { fields::NODE_COUNT } = graph.num_nodes(),
            { fields::EDGE_COUNT } = graph.num_edges(),
            { fields::PARSE_ERRORS } = graph.errors.len(),
            { fields::CALL_GRAPH_BUILD_TIME } = start.elapsed().as_millis() as u64,
            "call graph loaded"
        );
        Ok(graph)
    }

    /// Merge a static graph with a profile graph of the same program.
    ///
    /// Name-only nodes on either side are first reconciled against the other
    /// side (`fix`), then the static graph is folded in before the profile
    /// graph. Errors of both inputs are concatenated.
    pub fn from_merge(mut cflow: CallGraph, mut gprof: CallGraph, fragmentize: bool) -> Self {
        let start = Instant::now();
        let source = format!("cflow: {} - gprof: {}", cflow.source, gprof.source);

        let fixed = cflow.fix(&gprof) + gprof.fix(&cflow);

        let mut merged = CallGraph::new(source);
        merged.union(&cflow);
        merged.union(&gprof);
        merged.errors = cflow.errors;
        merged.errors.append(&mut gprof.errors);
        if fragmentize {
            merged.fragmentize();
        }

        info!(
            source = %merged.source,
            fixed,
            { fields::NODE_COUNT } = merged.num_nodes(),
            { fields::EDGE_COUNT } = merged.num_edges(),
            { fields::CALL_GRAPH_BUILD_TIME } = start.elapsed().as_millis() as u64,
            "call graphs merged"
        );
        merged
    }
}
