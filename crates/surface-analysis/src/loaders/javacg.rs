//! java-callgraph output for Android applications.

use surface_core::config::LoaderConfig;
use surface_core::errors::LoadError;
use tracing::{debug, info_span};

use super::attrs::GraphBuilder;
use super::{LoadOutput, LoadSource, Loader, LoaderOptions};
use crate::call_graph::Provenance;
use crate::parsers::javacg::JavaCgParser;
use crate::parsers::LineParser;

/// Loads method-to-method lines (`M:` prefix). Class-level lines are ignored.
#[derive(Debug, Clone)]
pub struct JavaCgLoader {
    source: LoadSource,
    app_packages: Vec<String>,
    options: LoaderOptions,
}

impl JavaCgLoader {
    pub fn new(source: impl Into<LoadSource>) -> Self {
        Self {
            source: source.into(),
            app_packages: Vec::new(),
            options: LoaderOptions::default(),
        }
    }

    /// Keep only lines mentioning at least one of `packages`.
    pub fn with_app_packages(mut self, packages: Vec<String>) -> Self {
        self.app_packages = packages;
        self
    }

    /// Package filter and granularity from `config`.
    pub fn with_config(mut self, config: &LoaderConfig) -> Self {
        self.app_packages = config.effective_app_packages().to_vec();
        self.options.granularity = config.effective_granularity();
        self
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    fn wanted(&self, line: &str) -> bool {
        line.starts_with("M:")
            && (self.app_packages.is_empty()
                || self.app_packages.iter().any(|p| line.contains(p.as_str())))
    }
}

impl Loader for JavaCgLoader {
    fn source(&self) -> String {
        self.source.describe()
    }

    fn load(&self) -> Result<LoadOutput, LoadError> {
        let _span = info_span!("javacg_load", source = %self.source.describe()).entered();

        let parser = JavaCgParser;
        let mut builder = GraphBuilder::new(self.source(), &self.options, Provenance::JavaCg);
        let mut errors = Vec::new();
        let mut skipped = 0usize;

        for (index, line) in self.source.lines()?.enumerate() {
            let line = line?;
            if !self.wanted(&line) {
                skipped += 1;
                continue;
            }
            match parser.parse(&line) {
                Ok((caller, callee)) => builder.add_call(&caller, &callee),
                Err(e) => errors.push(e.at_line(index + 1)),
            }
        }

        debug!(skipped, parse_errors = errors.len(), "javacg lines read");
        Ok(LoadOutput {
            graph: builder.finish(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{Call, Environment};

    const TEXT: &str = "\
C:com.example.hello.MainActivity android.app.Activity
M:com.example.hello.MainActivity:onCreate (M)com.example.hello.Greeter:greet
M:com.example.hello.Greeter:greet (M)android.content.Context:startActivity
M:com.example.hello.Greeter:greet (M)java.lang.StringBuilder:toString
M:org.thirdparty.Lib:run (S)org.thirdparty.Lib:helper
";

    fn android(class: &str, method: &str) -> Call {
        Call::function(method, class, Environment::Android)
    }

    #[test]
    fn test_method_lines_only() {
        let graph = JavaCgLoader::new(LoadSource::text(TEXT)).load().unwrap().graph;
        let on_create = android("com.example.hello.MainActivity", "onCreate");
        let greet = android("com.example.hello.Greeter", "greet");

        assert!(graph.edge_attrs(&on_create, &greet).unwrap().is_call);
        assert!(graph.contains(&android("org.thirdparty.Lib", "helper")));
        assert!(!graph.contains(&android("android.content.Context", "startActivity")));
        assert!(graph.node_attrs(&greet).unwrap().exit);
    }

    #[test]
    fn test_filter_from_config() {
        let config = LoaderConfig {
            app_packages: Some(vec!["org.thirdparty".to_string()]),
            ..Default::default()
        };
        let graph = JavaCgLoader::new(LoadSource::text(TEXT))
            .with_config(&config)
            .load()
            .unwrap()
            .graph;
        assert_eq!(graph.num_nodes(), 2);
        assert!(graph.contains(&android("org.thirdparty.Lib", "run")));
    }

    #[test]
    fn test_app_package_filter() {
        let graph = JavaCgLoader::new(LoadSource::text(TEXT))
            .with_app_packages(vec!["com.example.hello".to_string()])
            .load()
            .unwrap()
            .graph;
        assert!(!graph.contains(&android("org.thirdparty.Lib", "run")));
        assert_eq!(graph.num_nodes(), 2);
    }
}
