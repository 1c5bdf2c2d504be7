//! GNU gprof call graph lines.
//!
//! Every line of a call graph block carries the function in a fixed-width
//! column. The field starts with the function name, optionally followed by
//! a `<cycle N>` tag, a `(file:line @ address)` locator, and the `[index]`.

use std::sync::LazyLock;

use regex::Regex;
use surface_core::errors::{ParseError, ParserKind};

use super::LineParser;
use crate::call::{Call, Environment};

/// 0-based column where the name field starts.
pub const FIELD_OFFSET: usize = 45;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w.]+)").expect("gprof name pattern is valid"));

static LOCATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\S+):\d+ @ [0-9a-fA-F]+\)").expect("gprof locator pattern is valid")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct GprofParser;

impl LineParser for GprofParser {
    type Output = Call;

    fn kind(&self) -> ParserKind {
        ParserKind::Gprof
    }

    fn parse(&self, line: &str) -> Result<Call, ParseError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let field = line.get(FIELD_OFFSET..).map(str::trim).unwrap_or("");
        if field.is_empty() {
            return Err(ParseError::MissingField {
                parser: ParserKind::Gprof,
                line: 0,
                field: "name",
                text: line.to_string(),
            });
        }

        let name = NAME_RE
            .captures(field)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| ParseError::Malformed {
                parser: ParserKind::Gprof,
                line: 0,
                text: line.to_string(),
            })?;

        let signature = LOCATOR_RE
            .captures(field)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or("");

        Ok(Call::function(name, signature, Environment::C))
    }
}
