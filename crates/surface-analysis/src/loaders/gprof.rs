//! Call graph sections of GNU gprof reports.

use std::path::PathBuf;

use surface_core::errors::{LoadError, ParseError};
use tracing::{debug, info_span, warn};

use super::attrs::GraphBuilder;
use super::{LoadOutput, LoadSource, Loader, LoaderOptions};
use crate::call::Call;
use crate::call_graph::Provenance;
use crate::parsers::gprof::GprofParser;
use crate::parsers::LineParser;

pub const HEADER: &str = "index % time    self  children    called     name";
pub const SEPARATOR: &str = "-----------------------------------------------";
pub const EOF: &str = "\x0c";

/// One `[N]` block: callers above the entry line, callees below it.
#[derive(Debug, Default)]
struct Block {
    entry: Option<Call>,
    seen_entry: bool,
    callers: Vec<Call>,
    callees: Vec<Call>,
}

impl Block {
    fn flush(&mut self, builder: &mut GraphBuilder<'_>) {
        let block = std::mem::take(self);
        // A block whose entry line failed to parse has nothing to attach to.
        let Some(entry) = block.entry else {
            return;
        };
        builder.add_node(&entry);
        for caller in &block.callers {
            builder.add_call(caller, &entry);
        }
        for callee in &block.callees {
            builder.add_call(&entry, callee);
        }
    }
}

/// Loads one gprof report. Every node it produces is `tested`.
#[derive(Debug, Clone)]
pub struct GprofLoader {
    source: LoadSource,
    options: LoaderOptions,
}

impl GprofLoader {
    pub fn new(source: impl Into<LoadSource>) -> Self {
        Self {
            source: source.into(),
            options: LoaderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub(crate) fn from_path(path: PathBuf, options: LoaderOptions) -> Self {
        Self {
            source: LoadSource::Path(path),
            options,
        }
    }
}

impl Loader for GprofLoader {
    fn source(&self) -> String {
        self.source.describe()
    }

    fn load(&self) -> Result<LoadOutput, LoadError> {
        let _span = info_span!("gprof_load", source = %self.source.describe()).entered();

        let parser = GprofParser;
        let mut builder = GraphBuilder::new(self.source(), &self.options, Provenance::Gprof);
        let mut errors: Vec<ParseError> = Vec::new();

        let mut header_passed = false;
        let mut block = Block::default();

        for (index, line) in self.source.lines()?.enumerate() {
            let line = line?;
            let number = index + 1;

            if !header_passed {
                header_passed = line.trim_end() == HEADER;
                continue;
            }

            // The sentinel is itself whitespace, so check it before trimming.
            if line.trim_end_matches(['\r', '\n']) == EOF {
                break;
            }
            let trimmed = line.trim_end();
            if trimmed == SEPARATOR {
                block.flush(&mut builder);
                continue;
            }
            if trimmed.is_empty() {
                continue;
            }

            let is_entry = line.starts_with('[');
            let parsed = parser.parse(&line).map_err(|e| e.at_line(number));
            match (is_entry, parsed) {
                (true, Ok(call)) => {
                    block.entry = Some(call);
                    block.seen_entry = true;
                }
                (true, Err(e)) => {
                    debug!(error = %e, "entry line unparseable, dropping block");
                    block.entry = None;
                    block.seen_entry = true;
                    errors.push(e);
                }
                (false, Ok(call)) if block.seen_entry => block.callees.push(call),
                (false, Ok(call)) => block.callers.push(call),
                (false, Err(e)) => {
                    debug!(error = %e, "skipping line");
                    errors.push(e);
                }
            }
        }

        if !header_passed {
            warn!(source = %self.source.describe(), "no gprof call graph header found");
        }
        // A report truncated before its last separator still counts.
        block.flush(&mut builder);

        Ok(LoadOutput {
            graph: builder.finish(),
            errors,
        })
    }
}
