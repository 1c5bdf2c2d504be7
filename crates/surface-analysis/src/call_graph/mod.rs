//! Call graph: petgraph StableGraph keyed by `Call` identity.
//!
//! Construction goes through a loader or a merge of two loaded graphs.
//! After that the topology is fixed; metric passes only rewrite attributes.

pub mod builder;
pub mod fix;
pub mod fragments;
pub mod types;

pub use types::{CallGraph, CallNode, EdgeAttrs, NodeAttrs, Provenance};
