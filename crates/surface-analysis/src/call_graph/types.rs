//! Call graph types: nodes, edges, and their attribute sets.

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Directed;
use serde::Serialize;
use surface_core::errors::{CallGraphError, ParseError};
use surface_core::types::collections::FxHashMap;

use crate::call::Call;

/// Node attribute names understood by `NodeAttrs::has`.
pub const NODE_ATTRIBUTES: &[&str] = &[
    "entry",
    "exit",
    "dangerous",
    "tested",
    "defense",
    "vulnerable",
    "frequency",
];

/// Attributes of a call graph node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeAttrs {
    /// Calls a standard input function.
    pub entry: bool,
    /// Calls a standard output function.
    pub exit: bool,
    /// Calls a risky system function.
    pub dangerous: bool,
    /// Seen in an execution profile.
    pub tested: bool,
    pub defense: bool,
    pub vulnerable: bool,
    /// Number of independent execution profiles that observed the node.
    pub frequency: Option<u32>,
    /// Named scores written by metric passes (e.g. `page_rank`).
    pub scores: FxHashMap<String, f64>,
}

impl NodeAttrs {
    /// True when the attribute is present. Unknown names are never present,
    /// except names of scores a metric pass has written.
    pub fn has(&self, attribute: &str) -> bool {
        match attribute {
            "entry" => self.entry,
            "exit" => self.exit,
            "dangerous" => self.dangerous,
            "tested" => self.tested,
            "defense" => self.defense,
            "vulnerable" => self.vulnerable,
            "frequency" => self.frequency.is_some(),
            other => self.scores.contains_key(other),
        }
    }

    /// Names of all present attributes.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = NODE_ATTRIBUTES
            .iter()
            .copied()
            .filter(|name| self.has(name))
            .collect();
        let mut scores: Vec<&str> = self.scores.keys().map(String::as_str).collect();
        scores.sort_unstable();
        names.extend(scores);
        names
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    pub fn score(&self, name: &str) -> Option<f64> {
        self.scores.get(name).copied()
    }

    /// Union with `other`. Frequency keeps the larger count.
    pub fn merge(&mut self, other: &NodeAttrs) {
        self.merge_flags(other);
        self.frequency = match (self.frequency, other.frequency) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Union with `other`, adding frequencies. Used when folding independent
    /// profiles together.
    pub fn accumulate(&mut self, other: &NodeAttrs) {
        self.merge_flags(other);
        self.frequency = match (self.frequency, other.frequency) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };
    }

    fn merge_flags(&mut self, other: &NodeAttrs) {
        self.entry |= other.entry;
        self.exit |= other.exit;
        self.dangerous |= other.dangerous;
        self.tested |= other.tested;
        self.defense |= other.defense;
        self.vulnerable |= other.vulnerable;
        for (name, value) in &other.scores {
            self.scores.entry(name.clone()).or_insert(*value);
        }
    }
}

/// Which producer an edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Provenance {
    Cflow,
    Gprof,
    JavaCg,
}

impl Provenance {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cflow => "cflow",
            Self::Gprof => "gprof",
            Self::JavaCg => "javacg",
        }
    }
}

/// Attributes of a call graph edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EdgeAttrs {
    pub cflow: bool,
    pub gprof: bool,
    /// Forward caller → callee edge.
    pub is_call: bool,
    /// Back edge paired with a forward edge.
    pub is_return: bool,
    pub weight: Option<u32>,
}

impl EdgeAttrs {
    /// A forward edge from `provenance`.
    pub fn call(provenance: Provenance) -> Self {
        Self {
            is_call: true,
            ..Self::from_provenance(provenance)
        }
    }

    /// The back edge paired with a forward edge from `provenance`.
    pub fn returning(provenance: Provenance) -> Self {
        Self {
            is_return: true,
            ..Self::from_provenance(provenance)
        }
    }

    fn from_provenance(provenance: Provenance) -> Self {
        Self {
            cflow: provenance == Provenance::Cflow,
            gprof: provenance == Provenance::Gprof,
            ..Self::default()
        }
    }

    pub fn has(&self, attribute: &str) -> bool {
        match attribute {
            "cflow" => self.cflow,
            "gprof" => self.gprof,
            "call" => self.is_call,
            "return" => self.is_return,
            "weight" => self.weight.is_some(),
            _ => false,
        }
    }

    /// Union of flags. The first weight written wins.
    pub fn merge(&mut self, other: &EdgeAttrs) {
        self.cflow |= other.cflow;
        self.gprof |= other.gprof;
        self.is_call |= other.is_call;
        self.is_return |= other.is_return;
        self.weight = self.weight.or(other.weight);
    }
}

/// A node of the call graph.
#[derive(Debug, Clone, Serialize)]
pub struct CallNode {
    pub call: Call,
    pub attrs: NodeAttrs,
}

/// The call graph: a directed graph of calls with at most one edge per
/// ordered pair of nodes.
#[derive(Debug, Clone)]
pub struct CallGraph {
    /// The underlying petgraph StableGraph.
    pub graph: StableGraph<CallNode, EdgeAttrs, Directed>,
    /// Map from call identity → NodeIndex for O(1) lookup.
    pub node_index: FxHashMap<Call, NodeIndex>,
    pub(crate) source: String,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) num_fragments: Option<usize>,
    pub(crate) monolithicity: Option<f64>,
}

impl CallGraph {
    /// Create an empty call graph for `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: FxHashMap::default(),
            source: source.into(),
            errors: Vec::new(),
            num_fragments: None,
            monolithicity: None,
        }
    }

    /// Where the graph came from, e.g. `cflow: a.txt - gprof: b.txt`.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lines the loaders could not parse.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of strongly connected components, once fragmented.
    pub fn num_fragments(&self) -> Option<usize> {
        self.num_fragments
    }

    /// Largest fragment size over the original node count, once fragmented.
    pub fn monolithicity(&self) -> Option<f64> {
        self.monolithicity
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.node_index.contains_key(call)
    }

    pub fn index_of(&self, call: &Call) -> Option<NodeIndex> {
        self.node_index.get(call).copied()
    }

    /// Like `index_of`, but absent calls are an error.
    pub fn require(&self, call: &Call) -> Result<NodeIndex, CallGraphError> {
        self.index_of(call)
            .ok_or_else(|| CallGraphError::NodeNotFound {
                call: call.to_string(),
            })
    }

    pub fn call_at(&self, index: NodeIndex) -> Option<&Call> {
        self.graph.node_weight(index).map(|node| &node.call)
    }

    pub fn node_attrs(&self, call: &Call) -> Option<&NodeAttrs> {
        let index = self.index_of(call)?;
        self.graph.node_weight(index).map(|node| &node.attrs)
    }

    pub fn node_attrs_mut(&mut self, call: &Call) -> Option<&mut NodeAttrs> {
        let index = self.index_of(call)?;
        self.graph.node_weight_mut(index).map(|node| &mut node.attrs)
    }

    pub fn edge_attrs(&self, caller: &Call, callee: &Call) -> Option<&EdgeAttrs> {
        let edge = self.graph.find_edge(self.index_of(caller)?, self.index_of(callee)?)?;
        self.graph.edge_weight(edge)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (&Call, &NodeAttrs)> + '_ {
        self.graph
            .node_indices()
            .filter_map(|index| self.graph.node_weight(index))
            .map(|node| (&node.call, &node.attrs))
    }

    /// All calls in insertion order.
    pub fn calls(&self) -> impl Iterator<Item = &Call> + '_ {
        self.nodes().map(|(call, _)| call)
    }

    /// All edges as `(caller, callee, attrs)`.
    pub fn edges(&self) -> impl Iterator<Item = (&Call, &Call, &EdgeAttrs)> + '_ {
        self.graph.edge_references().filter_map(|edge| {
            let source = self.call_at(edge.source())?;
            let target = self.call_at(edge.target())?;
            Some((source, target, edge.weight()))
        })
    }

    /// Add a node, or merge `attrs` into the existing node with the same identity.
    pub fn add_node(&mut self, call: Call, attrs: NodeAttrs) -> NodeIndex {
        if let Some(&existing) = self.node_index.get(&call) {
            if let Some(node) = self.graph.node_weight_mut(existing) {
                node.attrs.merge(&attrs);
            }
            return existing;
        }
        let index = self.graph.add_node(CallNode {
            call: call.clone(),
            attrs,
        });
        self.node_index.insert(call, index);
        index
    }

    /// Add an edge, creating missing endpoints with empty attributes.
    /// An existing edge between the same pair absorbs `attrs`.
    pub fn add_edge(&mut self, caller: &Call, callee: &Call, attrs: EdgeAttrs) -> EdgeIndex {
        let source = self.add_node(caller.clone(), NodeAttrs::default());
        let target = self.add_node(callee.clone(), NodeAttrs::default());
        self.add_edge_between(source, target, attrs)
    }

    pub(crate) fn add_edge_between(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        attrs: EdgeAttrs,
    ) -> EdgeIndex {
        if let Some(edge) = self.graph.find_edge(source, target) {
            if let Some(existing) = self.graph.edge_weight_mut(edge) {
                existing.merge(&attrs);
            }
            return edge;
        }
        self.graph.add_edge(source, target, attrs)
    }

    /// Remove a node and its incident edges, returning its attributes.
    pub fn remove_node(&mut self, call: &Call) -> Option<NodeAttrs> {
        let index = self.node_index.remove(call)?;
        self.graph.remove_node(index).map(|node| node.attrs)
    }

    /// Nodes carrying `attribute`. Empty for unknown attributes.
    pub fn get_nodes(&self, attribute: &str) -> Vec<Call> {
        self.nodes()
            .filter(|(_, attrs)| attrs.has(attribute))
            .map(|(call, _)| call.clone())
            .collect()
    }

    pub fn entry_points(&self) -> Vec<Call> {
        self.get_nodes("entry")
    }

    pub fn exit_points(&self) -> Vec<Call> {
        self.get_nodes("exit")
    }

    /// Fold `other` into this graph: node and edge union with attribute merge.
    pub fn union(&mut self, other: &CallGraph) {
        for (call, attrs) in other.nodes() {
            self.add_node(call.clone(), attrs.clone());
        }
        for (caller, callee, attrs) in other.edges() {
            self.add_edge(caller, callee, attrs.clone());
        }
    }
}

impl Default for CallGraph {
    fn default() -> Self {
        Self::new("")
    }
}
