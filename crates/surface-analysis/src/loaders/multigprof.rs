//! Aggregation of several gprof reports of the same program.
//!
//! A feeder thread pushes paths into a bounded work channel, a fixed pool of
//! workers each runs a `GprofLoader`, and the calling thread folds results
//! off a bounded result channel. The fold is commutative, so result order
//! does not matter.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use surface_core::config::LoaderConfig;
use surface_core::errors::LoadError;
use surface_core::tracing::metrics as fields;
use tracing::{debug, info, info_span};

use super::gprof::GprofLoader;
use super::{LoadOutput, Loader, LoaderOptions};
use crate::call_graph::CallGraph;

type WorkerResult = Result<LoadOutput, LoadError>;

#[derive(Debug, Clone)]
pub struct MultiGprofLoader {
    paths: Vec<PathBuf>,
    options: LoaderOptions,
    workers: usize,
    work_queue: usize,
    result_queue: usize,
    timeout: Option<Duration>,
}

impl MultiGprofLoader {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        let defaults = LoaderConfig::default();
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            options: LoaderOptions::default(),
            workers: defaults.effective_workers(),
            work_queue: defaults.effective_work_queue(),
            result_queue: defaults.effective_result_queue(),
            timeout: None,
        }
    }

    /// Pool size, queue capacities, timeout, and granularity from `config`.
    pub fn with_config(mut self, config: &LoaderConfig) -> Self {
        self.workers = config.effective_workers();
        self.work_queue = config.effective_work_queue();
        self.result_queue = config.effective_result_queue();
        self.timeout = config.timeout_ms.map(Duration::from_millis);
        if let Some(granularity) = config.granularity {
            self.options.granularity = granularity;
        }
        self
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn spawn_workers(&self, count: usize) -> Result<Receiver<WorkerResult>, LoadError> {
        let (work_tx, work_rx) = bounded::<PathBuf>(self.work_queue);
        let (result_tx, result_rx) = bounded::<WorkerResult>(self.result_queue);

        let paths = self.paths.clone();
        thread::Builder::new()
            .name("gprof-feeder".to_string())
            .spawn(move || {
                for path in paths {
                    if work_tx.send(path).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| LoadError::Worker {
                message: format!("can not spawn feeder: {e}"),
            })?;

        for id in 0..count {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let options = self.options.clone();
            thread::Builder::new()
                .name(format!("gprof-worker-{id}"))
                .spawn(move || {
                    for path in work_rx.iter() {
                        debug!(worker = id, path = %path.display(), "loading profile");
                        let loader = GprofLoader::from_path(path, options.clone());
                        let result = panic::catch_unwind(AssertUnwindSafe(|| loader.load()))
                            .unwrap_or_else(|payload| {
                                Err(LoadError::Worker {
                                    message: panic_message(&*payload),
                                })
                            });
                        // The aggregator stopped listening after an error.
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                    debug!(worker = id, "profile worker finished");
                })
                .map_err(|e| LoadError::Worker {
                    message: format!("can not spawn worker {id}: {e}"),
                })?;
        }

        Ok(result_rx)
    }

    fn receive(&self, results: &Receiver<WorkerResult>) -> WorkerResult {
        let disconnected = || LoadError::Worker {
            message: "profile workers exited before publishing every result".to_string(),
        };
        match self.timeout {
            Some(timeout) => results.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => LoadError::Timeout {
                    waited_ms: timeout.as_millis() as u64,
                },
                RecvTimeoutError::Disconnected => disconnected(),
            })?,
            None => results.recv().map_err(|_| disconnected())?,
        }
    }
}

impl Loader for MultiGprofLoader {
    fn source(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn load(&self) -> Result<LoadOutput, LoadError> {
        let _span = info_span!("multigprof_load", { fields::PROFILE_COUNT } = self.paths.len())
            .entered();
        let start = Instant::now();

        let mut graph = CallGraph::new(self.source());
        let mut errors = Vec::new();
        if self.paths.is_empty() {
            return Ok(LoadOutput { graph, errors });
        }

        let workers = self.workers.clamp(1, self.paths.len());
        let results = self.spawn_workers(workers)?;

        // Dropping `results` on an early return unblocks the workers.
        for _ in 0..self.paths.len() {
            let mut output = self.receive(&results)?;
            accumulate(&mut graph, &output.graph);
            errors.append(&mut output.errors);
        }

        info!(
            workers,
            { fields::PROFILE_COUNT } = self.paths.len(),
            { fields::NODE_COUNT } = graph.num_nodes(),
            { fields::PARSE_ERRORS } = errors.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "profiles aggregated"
        );
        Ok(LoadOutput { graph, errors })
    }
}

/// Fold one profile graph into the aggregate, counting node observations.
fn accumulate(aggregate: &mut CallGraph, profile: &CallGraph) {
    for (call, attrs) in profile.nodes() {
        match aggregate.node_attrs_mut(call) {
            Some(existing) => existing.accumulate(attrs),
            None => {
                aggregate.add_node(call.clone(), attrs.clone());
            }
        }
    }
    for (caller, callee, attrs) in profile.edges() {
        aggregate.add_edge(caller, callee, attrs.clone());
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "profile worker panicked".to_string()
    }
}
