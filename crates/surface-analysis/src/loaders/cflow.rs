//! Static call trees printed by GNU cflow.

use surface_core::errors::{LoadError, ParserKind};
use surface_core::tracing::metrics as fields;
use tracing::{debug, info_span};

use super::attrs::GraphBuilder;
use super::{LoadOutput, LoadSource, Loader, LoaderOptions};
use crate::call::Call;
use crate::call_graph::Provenance;
use crate::parsers::cflow::{CflowLine, CflowParser};
use crate::parsers::LineParser;

/// Loads a cflow tree (`cflow` or `cflow -r` output).
///
/// In reverse mode each indented line is a caller of the line it is nested
/// under, so edges point from the nested line to its parent. The resulting
/// graph is always caller → callee.
#[derive(Debug, Clone)]
pub struct CflowLoader {
    source: LoadSource,
    reverse: bool,
    options: LoaderOptions,
}

impl CflowLoader {
    pub fn new(source: impl Into<LoadSource>, reverse: bool) -> Self {
        Self {
            source: source.into(),
            reverse,
            options: LoaderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }
}

impl Loader for CflowLoader {
    fn source(&self) -> String {
        self.source.describe()
    }

    fn load(&self) -> Result<LoadOutput, LoadError> {
        let _span = info_span!("cflow_load", source = %self.source.describe(), reverse = self.reverse)
            .entered();

        let parser = CflowParser;
        let mut builder = GraphBuilder::new(self.source(), &self.options, Provenance::Cflow);
        let mut errors = Vec::new();

        let mut parents: Vec<Call> = Vec::new();
        let mut previous: Option<CflowLine> = None;
        let mut lines_read = 0usize;

        for (index, line) in self.source.lines()?.enumerate() {
            let line = line?;
            lines_read += 1;
            if line.trim().is_empty() {
                continue;
            }

            let current = match parser.parse(&line) {
                Ok(current) => current,
                Err(e) => {
                    debug!(error = %e, "skipping line");
                    errors.push(e.at_line(index + 1));
                    continue;
                }
            };

            if let Some(previous) = previous.take() {
                if current.level > previous.level {
                    parents.push(previous.call);
                } else if current.level < previous.level {
                    let depth = parents.len().saturating_sub(previous.level - current.level);
                    parents.truncate(depth);
                }
            }

            if let Some(top) = parents.last() {
                if self.reverse {
                    builder.add_call(&current.call, top);
                } else {
                    builder.add_call(top, &current.call);
                }
            }

            previous = Some(current);
        }

        debug!(
            { fields::LINES_READ } = lines_read,
            { fields::PARSE_ERRORS } = errors.len(),
            kind = %ParserKind::Cflow,
            "cflow tree read"
        );
        Ok(LoadOutput {
            graph: builder.finish(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Environment;

    const TREE: &str = "\
main() <int main (void) at ./src/helloworld.c:5>:
    greet() <void greet (void) at ./src/greetings.c:3>:
        printf()
    getchar()
";

    fn c(name: &str, file: &str) -> Call {
        Call::function(name, file, Environment::C)
    }

    #[test]
    fn test_forward_tree() {
        let output = CflowLoader::new(LoadSource::text(TREE), false).load().unwrap();
        let graph = output.graph;
        let main = c("main", "./src/helloworld.c");
        let greet = c("greet", "./src/greetings.c");

        assert_eq!(graph.num_nodes(), 2);
        assert!(graph.edge_attrs(&main, &greet).unwrap().is_call);
        assert!(graph.edge_attrs(&greet, &main).unwrap().is_return);
        assert!(graph.node_attrs(&main).unwrap().entry);
        assert!(graph.node_attrs(&greet).unwrap().exit);
        assert!(output.errors.is_empty());
    }

    #[test]
    fn test_reverse_tree() {
        let reverse = "\
greet() <void greet (void) at ./src/greetings.c:3>:
    main() <int main (void) at ./src/helloworld.c:5>
printf():
    greet() <void greet (void) at ./src/greetings.c:3>:
        main() <int main (void) at ./src/helloworld.c:5>
";
        let graph = CflowLoader::new(LoadSource::text(reverse), true)
            .load()
            .unwrap()
            .graph;
        let main = c("main", "./src/helloworld.c");
        let greet = c("greet", "./src/greetings.c");

        assert_eq!(graph.num_nodes(), 2);
        assert!(graph.edge_attrs(&main, &greet).unwrap().is_call);
        assert!(graph.node_attrs(&greet).unwrap().exit);
    }

    #[test]
    fn test_bad_line_is_recorded_and_skipped() {
        let text = "main() <int main (void) at ./a.c:1>:\n    ???\n    greet() <void greet (void) at ./a.c:9>\n";
        let output = CflowLoader::new(LoadSource::text(text), false).load().unwrap();
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].line(), 2);
        assert_eq!(output.graph.num_nodes(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CflowLoader::new(std::path::Path::new("/nonexistent/cflow.txt"), false)
            .load()
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
