//! surface-analysis: call graph loading, merging, and attack surface metrics.
//!
//! Producer text flows through a line parser into a loader, which builds a
//! `CallGraph`. Two graphs of the same program can be merged, and the
//! metrics engine then classifies, ranks, and measures the result.

pub mod call;
pub mod call_graph;
pub mod loaders;
pub mod metrics;
pub mod parsers;

use std::path::{Path, PathBuf};

use surface_core::config::LoaderConfig;
use surface_core::errors::LoadError;

pub use call::{Call, Environment, Granularity};
pub use call_graph::{CallGraph, EdgeAttrs, NodeAttrs};
pub use loaders::{
    CflowLoader, GprofLoader, JavaCgLoader, LoadSource, Loader, LoaderOptions, MultiGprofLoader,
};
pub use metrics::{EdgeWeights, PageRankParams, SurfaceKind, SurfaceMetrics};

/// Load a cflow tree from a file path or in-memory text.
pub fn load_static(source: impl Into<LoadSource>, reverse: bool) -> Result<CallGraph, LoadError> {
    CallGraph::from_loader(&CflowLoader::new(source, reverse), false)
}

/// Load a single gprof call graph listing.
pub fn load_profile(path: impl AsRef<Path>) -> Result<CallGraph, LoadError> {
    CallGraph::from_loader(&GprofLoader::new(path.as_ref()), false)
}

/// Load and aggregate several gprof listings with `workers` parser threads.
pub fn load_profile_many<P: AsRef<Path>>(
    paths: &[P],
    workers: usize,
) -> Result<CallGraph, LoadError> {
    let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
    let config = LoaderConfig {
        workers: Some(workers),
        ..Default::default()
    };
    CallGraph::from_loader(&MultiGprofLoader::new(paths).with_config(&config), false)
}

/// Load a java-callgraph listing, keeping only lines that mention one of
/// `package_filter` (all lines when the filter is empty).
pub fn load_java(
    path: impl AsRef<Path>,
    package_filter: &[String],
) -> Result<CallGraph, LoadError> {
    CallGraph::from_loader(
        &JavaCgLoader::new(path.as_ref()).with_app_packages(package_filter.to_vec()),
        false,
    )
}

/// Merge a static (cflow) graph with a profile (gprof) graph.
pub fn merge(cflow: CallGraph, gprof: CallGraph) -> CallGraph {
    CallGraph::from_merge(cflow, gprof, false)
}
