//! Loader configuration.

use serde::{Deserialize, Serialize};

/// Unit of analysis for a call graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Function,
    File,
}

impl Granularity {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Granularity {
    type Err = crate::errors::CallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(Self::Function),
            "file" => Ok(Self::File),
            other => Err(crate::errors::CallError::UnsupportedGranularity {
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for the call graph loaders.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoaderConfig {
    /// Number of profile parser workers. Default: 2.
    pub workers: Option<usize>,
    /// Capacity of the pending profile queue. Default: 50.
    pub work_queue: Option<usize>,
    /// Capacity of the finished graph queue. Default: 1.
    pub result_queue: Option<usize>,
    /// Max milliseconds to wait for any single profile result. Default: none.
    pub timeout_ms: Option<u64>,
    /// Node granularity. Default: function.
    pub granularity: Option<Granularity>,
    /// java-callgraph package filter. Default: empty (keep every line).
    pub app_packages: Option<Vec<String>>,
}

impl LoaderConfig {
    /// Returns the effective worker count, defaulting to 2.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or(2)
    }

    /// Returns the effective work queue capacity, defaulting to 50.
    pub fn effective_work_queue(&self) -> usize {
        self.work_queue.unwrap_or(50)
    }

    /// Returns the effective result queue capacity, defaulting to 1.
    pub fn effective_result_queue(&self) -> usize {
        self.result_queue.unwrap_or(1)
    }

    pub fn effective_granularity(&self) -> Granularity {
        self.granularity.unwrap_or_default()
    }

    pub fn effective_app_packages(&self) -> &[String] {
        self.app_packages.as_deref().unwrap_or(&[])
    }
}
