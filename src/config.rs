//! Workload files.
//!
//! A workload is a TOML or JSON document naming the algorithm, the quantum,
//! playback settings and the process list:
//!
//! ```toml
//! algorithm = "rr"
//! quantum = 2
//!
//! [playback]
//! interval_ms = 220
//!
//! [[processes]]
//! id = "P1"
//! arrival = 0
//! burst = 8
//! priority = 2
//! ```

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    scheduler::{Algorithm, DEFAULT_QUANTUM},
    sim::{workload, ProcessSpec},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Time slice for Round-Robin; ignored by the other algorithms
    #[serde(default = "default_quantum")]
    pub quantum: u64,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub processes: Vec<ProcessSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between two replayed frames
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Start replaying as soon as the simulation is computed
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
}

fn default_quantum() -> u64 {
    DEFAULT_QUANTUM
}

fn default_interval_ms() -> u64 {
    220
}

fn default_autoplay() -> bool {
    true
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            quantum: default_quantum(),
            playback: PlaybackConfig::default(),
            processes: Vec::new(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            autoplay: default_autoplay(),
        }
    }
}

impl PlaybackConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl SimConfig {
    /// Loads a workload, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let parse: fn(&str) -> Result<Self> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml,
            Some("json") => Self::from_json,
            _ => return Err(Error::UnsupportedFormat(path.to_path_buf())),
        };

        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&text)?;

        debug!(
            path = %path.display(),
            algorithm = %config.algorithm,
            processes = config.processes.len(),
            "loaded workload"
        );
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str::<Self>(text)?.checked()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str::<Self>(text)?.checked()
    }

    /// An empty process list is accepted so a preset can fill it in later;
    /// duplicate ids never are.
    fn checked(self) -> Result<Self> {
        if !self.processes.is_empty() {
            workload::validate(&self.processes)?;
        }
        Ok(self)
    }
}
