//! Loaders: drive a producer's text through its line parser and build a
//! `CallGraph`.
//!
//! Every forward edge gets a paired return edge, and standard library
//! callees are folded into their caller's attributes instead of becoming
//! nodes.

pub mod attrs;
pub mod cflow;
pub mod gprof;
pub mod javacg;
pub mod multigprof;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use surface_core::config::Granularity;
use surface_core::errors::{LoadError, ParseError};

use crate::call::Call;
use crate::call_graph::CallGraph;

pub use cflow::CflowLoader;
pub use gprof::GprofLoader;
pub use javacg::JavaCgLoader;
pub use multigprof::MultiGprofLoader;

/// The common capability of every producer.
pub trait Loader {
    /// Human-readable origin of the graph.
    fn source(&self) -> String;

    /// Build the graph. Unparseable lines are returned next to it.
    fn load(&self) -> Result<LoadOutput, LoadError>;
}

/// A loaded graph and the lines that could not be parsed.
#[derive(Debug)]
pub struct LoadOutput {
    pub graph: CallGraph,
    pub errors: Vec<ParseError>,
}

/// Where producer text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Path(PathBuf),
    Text(String),
}

impl LoadSource {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Text(_) => "<text>".to_string(),
        }
    }

    /// Stream the source line by line, without line terminators.
    pub fn lines(
        &self,
    ) -> Result<Box<dyn Iterator<Item = Result<String, LoadError>> + '_>, LoadError> {
        match self {
            Self::Path(path) => {
                let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
                Ok(Box::new(
                    BufReader::new(file)
                        .lines()
                        .map(move |line| line.map_err(|e| LoadError::io(path, e))),
                ))
            }
            Self::Text(text) => Ok(Box::new(text.lines().map(|line| Ok(line.to_string())))),
        }
    }
}

impl From<PathBuf> for LoadSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for LoadSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for LoadSource {
    fn from(path: &PathBuf) -> Self {
        Self::Path(path.clone())
    }
}

/// Options shared by every loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Calls known to be designed defenses.
    pub defenses: Vec<Call>,
    /// Calls known to be vulnerable.
    pub vulnerabilities: Vec<Call>,
    pub granularity: Granularity,
}

impl LoaderOptions {
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_defenses(mut self, defenses: Vec<Call>) -> Self {
        self.defenses = defenses;
        self
    }

    pub fn with_vulnerabilities(mut self, vulnerabilities: Vec<Call>) -> Self {
        self.vulnerabilities = vulnerabilities;
        self
    }

    /// Membership is checked at the granularity the listed call was given in.
    pub fn is_defense(&self, call: &Call) -> bool {
        listed(&self.defenses, call)
    }

    pub fn is_vulnerable(&self, call: &Call) -> bool {
        listed(&self.vulnerabilities, call)
    }
}

fn listed(list: &[Call], call: &Call) -> bool {
    list.iter()
        .any(|item| call.at_granularity(item.granularity()).as_ref() == Some(item))
}
