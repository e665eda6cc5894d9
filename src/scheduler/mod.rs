pub mod fcfs;
pub mod priority;
pub mod rr;
pub mod srtf;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    core::state::{JobId, QueueId, SimCtx, Ticks},
    error::Error,
};
pub use fcfs::FcfsPolicy;
pub use priority::PriorityPolicy;
pub use rr::RoundRobinPolicy;
pub use srtf::SrtfPolicy;

pub const DEFAULT_QUANTUM: Ticks = 2;

pub const SRTF_PREEMPT_NOTE: &str = "SRTF preempt";
pub const QUANTUM_EXPIRED_NOTE: &str = "quantum expired";

/// Selection policy plugged into the scheduling core.
///
/// A policy owns the ready queue it schedules from. The core moves jobs in
/// through [`Policy::enqueue`] and out through [`Policy::pick`]; nothing else
/// touches that queue.
pub trait Policy {
    const ALGORITHM: Algorithm;

    fn init(ctx: &mut SimCtx, quantum: Ticks) -> Self;

    fn ready_queue(&self) -> QueueId;

    fn enqueue(&mut self, ctx: &mut SimCtx, job: JobId);

    fn pick(&mut self, ctx: &mut SimCtx) -> Option<JobId> {
        ctx.queue_pop(self.ready_queue())
    }

    /// Time slice granted per dispatch, if the policy slices at all.
    fn slice(&self) -> Option<Ticks> {
        None
    }

    /// Checked after every executed unit. `Some(note)` evicts the running job.
    fn preempt(&self, _ctx: &SimCtx, _running: JobId) -> Option<&'static str> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Fcfs,
    #[serde(alias = "srtf")]
    Sjf,
    Priority,
    #[serde(alias = "round-robin")]
    Rr,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Self::Fcfs, Self::Sjf, Self::Priority, Self::Rr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::Priority => "priority",
            Self::Rr => "rr",
        }
    }

    /// Human-readable name, as shown above a Gantt chart.
    pub fn label(&self, quantum: Ticks) -> String {
        match self {
            Self::Fcfs => "FCFS (FIFO)".to_string(),
            Self::Sjf => "SJF (preemptive, SRTF)".to_string(),
            Self::Priority => "Priority (lower number = higher)".to_string(),
            Self::Rr => format!("Round-Robin (q={})", quantum.max(1)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "sjf" | "srtf" => Ok(Self::Sjf),
            "priority" | "prio" => Ok(Self::Priority),
            "rr" | "round-robin" | "roundrobin" => Ok(Self::Rr),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}
