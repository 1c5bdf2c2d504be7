//! Line parser errors.
//!
//! A parse error never aborts a load. Loaders collect them and hand them
//! back next to the (partial) graph.

use super::error_code::{self, SurfaceErrorCode};

/// Which producer format a line was parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserKind {
    Cflow,
    Gprof,
    JavaCg,
}

impl ParserKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cflow => "cflow",
            Self::Gprof => "gprof",
            Self::JavaCg => "javacg",
        }
    }
}

impl std::fmt::Display for ParserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single input line that does not match the producer's grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{parser} line {line}: no function name in {text:?}")]
    MissingName {
        parser: ParserKind,
        line: usize,
        text: String,
    },

    #[error("{parser} line {line}: missing {field} in {text:?}")]
    MissingField {
        parser: ParserKind,
        line: usize,
        field: &'static str,
        text: String,
    },

    #[error("{parser} line {line}: can not parse a call from {text:?}")]
    Malformed {
        parser: ParserKind,
        line: usize,
        text: String,
    },
}

impl ParseError {
    /// The 1-based line number the error was raised on (0 when unknown).
    pub fn line(&self) -> usize {
        match self {
            Self::MissingName { line, .. }
            | Self::MissingField { line, .. }
            | Self::Malformed { line, .. } => *line,
        }
    }

    /// Re-tag the error with the line number the loader was reading.
    pub fn at_line(mut self, number: usize) -> Self {
        match &mut self {
            Self::MissingName { line, .. }
            | Self::MissingField { line, .. }
            | Self::Malformed { line, .. } => *line = number,
        }
        self
    }
}

impl SurfaceErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
