//! Call construction errors.

use super::error_code::{self, SurfaceErrorCode};

/// Errors raised while constructing a call from untyped input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("Unsupported granularity: {value}")]
    UnsupportedGranularity { value: String },

    #[error("Unsupported environment: {value}")]
    UnsupportedEnvironment { value: String },
}

impl SurfaceErrorCode for CallError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedGranularity { .. } => error_code::UNSUPPORTED_GRANULARITY,
            Self::UnsupportedEnvironment { .. } => error_code::CALL_ERROR,
        }
    }
}
