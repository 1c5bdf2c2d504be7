//! Call graph errors.

use super::error_code::{self, SurfaceErrorCode};

/// Errors that can occur while querying metrics on a call graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallGraphError {
    #[error("{call} is not an entry point")]
    NotAnEntryPoint { call: String },

    #[error("{call} is not an exit point")]
    NotAnExitPoint { call: String },

    #[error("{call} is not a node of the call graph")]
    NodeNotFound { call: String },
}

impl SurfaceErrorCode for CallGraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAnEntryPoint { .. } => error_code::NOT_AN_ENTRY_POINT,
            Self::NotAnExitPoint { .. } => error_code::NOT_AN_EXIT_POINT,
            Self::NodeNotFound { .. } => error_code::CALL_GRAPH_ERROR,
        }
    }
}
