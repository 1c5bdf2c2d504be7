//! Line parsers: one producer line in, one structured record out.
//!
//! Parsers are stateless. They report errors with line number 0; the
//! loader driving them re-tags each error with the real line number.

pub mod cflow;
pub mod gprof;
pub mod javacg;

use surface_core::errors::{ParseError, ParserKind};

pub use cflow::{CflowLine, CflowParser};
pub use gprof::GprofParser;
pub use javacg::JavaCgParser;

/// Converts a single line of producer output.
pub trait LineParser {
    type Output;

    /// Which producer format this parser understands.
    fn kind(&self) -> ParserKind;

    /// Parse one line. Trailing newlines are tolerated.
    fn parse(&self, line: &str) -> Result<Self::Output, ParseError>;
}
