//! Node attribute derivation and the edge sink every loader writes through.

use tracing::trace;

use super::LoaderOptions;
use crate::call::Call;
use crate::call_graph::{CallGraph, EdgeAttrs, NodeAttrs, Provenance};

/// Attributes an edge `(caller, callee)` from `provenance` contributes.
///
/// The callee half is `None` when the callee is a standard library
/// function: it is not a node, and its classification lands on the caller.
pub fn node_attrs(
    provenance: Provenance,
    caller: &Call,
    callee: &Call,
    options: &LoaderOptions,
) -> (NodeAttrs, Option<NodeAttrs>) {
    let profiled = provenance == Provenance::Gprof;

    let mut caller_attrs = NodeAttrs {
        defense: options.is_defense(caller),
        vulnerable: options.is_vulnerable(caller),
        tested: profiled,
        frequency: profiled.then_some(1),
        ..Default::default()
    };

    if callee.in_stdlib() {
        caller_attrs.dangerous = callee.is_dangerous();
        caller_attrs.entry = callee.is_input();
        caller_attrs.exit = callee.is_output();
        return (caller_attrs, None);
    }

    let callee_attrs = NodeAttrs {
        defense: options.is_defense(callee),
        vulnerable: options.is_vulnerable(callee),
        tested: profiled,
        frequency: profiled.then_some(1),
        ..Default::default()
    };
    (caller_attrs, Some(callee_attrs))
}

/// Accumulates nodes and paired edges for one loader run.
pub(crate) struct GraphBuilder<'a> {
    graph: CallGraph,
    options: &'a LoaderOptions,
    provenance: Provenance,
}

impl<'a> GraphBuilder<'a> {
    pub(crate) fn new(source: String, options: &'a LoaderOptions, provenance: Provenance) -> Self {
        Self {
            graph: CallGraph::new(source),
            options,
            provenance,
        }
    }

    /// Add a lone node (a profile entry with no callers or callees).
    pub(crate) fn add_node(&mut self, call: &Call) {
        if call.in_stdlib() {
            return;
        }
        let Some(node) = call.at_granularity(self.options.granularity) else {
            return;
        };
        let profiled = self.provenance == Provenance::Gprof;
        let attrs = NodeAttrs {
            defense: self.options.is_defense(call),
            vulnerable: self.options.is_vulnerable(call),
            tested: profiled,
            frequency: profiled.then_some(1),
            ..Default::default()
        };
        self.graph.add_node(node, attrs);
    }

    /// Record that `caller` calls `callee`.
    pub(crate) fn add_call(&mut self, caller: &Call, callee: &Call) {
        if caller.in_stdlib() {
            trace!(caller = %caller, callee = %callee, "library caller, edge dropped");
            return;
        }

        let (caller_attrs, callee_attrs) =
            node_attrs(self.provenance, caller, callee, self.options);

        let Some(caller_node) = caller.at_granularity(self.options.granularity) else {
            return;
        };
        self.graph.add_node(caller_node.clone(), caller_attrs);

        let Some(callee_attrs) = callee_attrs else {
            return;
        };
        let Some(callee_node) = callee.at_granularity(self.options.granularity) else {
            return;
        };
        self.graph.add_node(callee_node.clone(), callee_attrs);

        self.graph
            .add_edge(&caller_node, &callee_node, EdgeAttrs::call(self.provenance));
        self.graph
            .add_edge(&callee_node, &caller_node, EdgeAttrs::returning(self.provenance));
    }

    pub(crate) fn finish(self) -> CallGraph {
        self.graph
    }
}
