//! Loader errors.

use std::path::PathBuf;

use super::error_code::{self, SurfaceErrorCode};

/// Errors that abort a load. Per-line problems are `ParseError`s instead.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Can not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Profile worker failed: {message}")]
    Worker { message: String },

    #[error("Timed out after {waited_ms}ms waiting for profile results")]
    Timeout { waited_ms: u64 },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl SurfaceErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => error_code::IO_ERROR,
            _ => error_code::LOAD_ERROR,
        }
    }
}
