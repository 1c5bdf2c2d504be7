//! java-callgraph lines: `M:<class>:<method> (<kind>)<class>:<method>`.

use surface_core::errors::{ParseError, ParserKind};

use super::LineParser;
use crate::call::{Call, Environment};

/// Invocation kinds java-callgraph emits in front of the callee.
const CALL_KINDS: &[char] = &['M', 'I', 'O', 'S'];

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaCgParser;

impl JavaCgParser {
    /// Parse one half of a line: `M:<class>:<method>` or `(K)<class>:<method>`.
    pub fn parse_half(&self, text: &str) -> Result<Call, ParseError> {
        let text = text.trim();
        let body = if let Some(rest) = text.strip_prefix("M:") {
            rest
        } else {
            let mut chars = text.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some('('), Some(kind), Some(')')) if CALL_KINDS.contains(&kind) => &text[3..],
                _ => {
                    return Err(ParseError::Malformed {
                        parser: ParserKind::JavaCg,
                        line: 0,
                        text: text.to_string(),
                    })
                }
            }
        };

        let (class, method) =
            body.trim()
                .split_once(':')
                .ok_or_else(|| ParseError::MissingField {
                    parser: ParserKind::JavaCg,
                    line: 0,
                    field: "method",
                    text: text.to_string(),
                })?;
        if method.is_empty() {
            return Err(ParseError::MissingName {
                parser: ParserKind::JavaCg,
                line: 0,
                text: text.to_string(),
            });
        }

        Ok(Call::function(method, class, Environment::Android))
    }
}

impl LineParser for JavaCgParser {
    /// `(caller, callee)`
    type Output = (Call, Call);

    fn kind(&self) -> ParserKind {
        ParserKind::JavaCg
    }

    fn parse(&self, line: &str) -> Result<(Call, Call), ParseError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let (caller, callee) = line.split_once(' ').ok_or_else(|| ParseError::Malformed {
            parser: ParserKind::JavaCg,
            line: 0,
            text: line.to_string(),
        })?;
        Ok((self.parse_half(caller)?, self.parse_half(callee)?))
    }
}
