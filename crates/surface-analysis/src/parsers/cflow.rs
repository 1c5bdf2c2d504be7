//! GNU cflow tree lines.
//!
//! `<4-space indent>*name() [<decl at path:line>] [(R):]`

use std::sync::LazyLock;

use regex::Regex;
use surface_core::errors::{ParseError, ParserKind};

use super::LineParser;
use crate::call::{Call, Environment};

const INDENT: &str = "    ";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\(\)").expect("cflow name pattern is valid"));

static SIGNATURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"at\s(.*):\d+>").expect("cflow signature pattern is valid"));

/// A parsed cflow line: the call plus its depth in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CflowLine {
    pub call: Call,
    pub level: usize,
    /// cflow marked the call as (part of) a recursion. Informational only.
    pub recursive: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CflowParser;

impl LineParser for CflowParser {
    type Output = CflowLine;

    fn kind(&self) -> ParserKind {
        ParserKind::Cflow
    }

    fn parse(&self, line: &str) -> Result<CflowLine, ParseError> {
        let line = line.trim_end_matches(['\n', '\r']);

        let mut level = 0;
        let mut rest = line;
        while let Some(stripped) = rest.strip_prefix(INDENT) {
            level += 1;
            rest = stripped;
        }
        let info = rest.trim();

        let name = NAME_RE
            .captures(info)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| ParseError::MissingName {
                parser: ParserKind::Cflow,
                line: 0,
                text: line.to_string(),
            })?;

        let signature = SIGNATURE_RE
            .captures(info)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or("");

        let recursive = info.ends_with("(R):") || info.contains("(recursive: see");

        Ok(CflowLine {
            call: Call::function(name, signature, Environment::C),
            level,
            recursive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> CflowLine {
        CflowParser.parse(line).unwrap()
    }

    #[test]
    fn test_name_and_signature() {
        let parsed = parse("GreeterSayHi() <void GreeterSayHi () at ./src/helloworld.c:48>:");
        assert_eq!(parsed.call.name(), "GreeterSayHi");
        assert_eq!(parsed.call.signature(), "./src/helloworld.c");
        assert_eq!(parsed.level, 0);
        assert!(!parsed.recursive);
    }

    #[test]
    fn test_library_call_has_no_signature() {
        let parsed = parse("            printf()");
        assert_eq!(parsed.call.name(), "printf");
        assert_eq!(parsed.call.signature(), "");
        assert_eq!(parsed.level, 3);
    }

    #[test]
    fn test_recursion_marker_is_informational() {
        let plain = parse("    recursive_a() <void recursive_a (int i) at ./src/greetings.c:26>:");
        let marked = parse("    recursive_a() <void recursive_a (int i) at ./src/greetings.c:26> (R):");
        assert_eq!(marked.level, 1);
        assert!(marked.recursive);
        assert_eq!(plain.call, marked.call);

        let back_ref = parse(
            "        recursive_b() <void recursive_b (int i) at ./src/greetings.c:32> (recursive: see 9)",
        );
        assert_eq!(back_ref.level, 2);
        assert!(back_ref.recursive);
        assert_eq!(back_ref.call.signature(), "./src/greetings.c");
    }

    #[test]
    fn test_missing_name() {
        let err = CflowParser.parse("    <not a call>").unwrap_err();
        assert!(matches!(err, ParseError::MissingName { .. }));
    }
}
