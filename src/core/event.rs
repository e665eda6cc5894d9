use serde::{Deserialize, Serialize};

use crate::core::Ticks;

/// What happened at one step of the simulated clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Event {
    Arrival {
        pid: String,
    },
    Dispatch {
        pid: String,
    },
    Run {
        pid: String,
    },
    Complete {
        pid: String,
    },
    // Job leaves the CPU without finishing
    Context {
        pid: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    Idle,
}

impl Event {
    pub fn pid(&self) -> Option<&str> {
        match self {
            Self::Arrival { pid }
            | Self::Dispatch { pid }
            | Self::Run { pid }
            | Self::Complete { pid }
            | Self::Context { pid, .. } => Some(pid),
            Self::Idle => None,
        }
    }

    pub fn note(&self) -> Option<&str> {
        match self {
            Self::Context { note, .. } => note.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningView {
    pub id: String,
    pub remaining: Ticks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyView {
    pub id: String,
    pub remaining: Ticks,
    pub priority: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoneView {
    pub id: String,
    pub finish: Ticks,
}

/// Snapshot of the machine taken right after an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub t: Ticks,
    pub event: Event,
    pub running: Option<RunningView>,
    pub quantum_left: Option<Ticks>,
    pub ready: Vec<ReadyView>,
    pub done: Vec<DoneView>,
}
