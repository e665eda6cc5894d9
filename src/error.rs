//! Error types for the surfaces around the engine.
//!
//! The simulation itself never fails; these cover loading workloads and
//! parsing user input.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported workload format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("unknown algorithm: {0} (expected fcfs, sjf, priority or rr)")]
    UnknownAlgorithm(String),

    #[error("duplicate process id: {0}")]
    DuplicateProcessId(String),

    #[error("no processes supplied")]
    NoProcesses,
}
