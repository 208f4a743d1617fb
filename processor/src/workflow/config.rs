use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on the worker-thread count; requests above it are clamped.
pub const MAX_THREADS: usize = 16;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub thread_count: usize,
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading run config {}", path_ref.display()))?;
        let config: RunConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing run config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(input: PathBuf, output: PathBuf, thread_count: usize) -> Self {
        Self {
            input,
            output,
            thread_count,
        }
    }

    /// Thread count clamped into `1..=MAX_THREADS`. Partitioning only;
    /// the output bytes never depend on it.
    pub fn normalized_threads(&self) -> usize {
        self.thread_count.clamp(1, MAX_THREADS)
    }
}
