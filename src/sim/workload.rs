//! Ready-made process lists and the workload check shared by config parsing
//! and the CLI.

use rand::prelude::*;
use rustc_hash::FxHashSet;

use super::job::ProcessSpec;
use crate::error::{Error, Result};

/// The four-process sample set: mixed arrivals, bursts and priorities.
pub fn classic() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new("P1", 0, 8).with_priority(2),
        ProcessSpec::new("P2", 1, 4).with_priority(1),
        ProcessSpec::new("P3", 2, 9).with_priority(3),
        ProcessSpec::new("P4", 3, 5).with_priority(2),
    ]
}

/// Seeded random workload: at each of `ticks` clock values a process arrives
/// with probability `p_arrival`; it is short with probability `p_short`.
pub fn bernoulli(
    ticks: u64,
    p_arrival: f64,
    p_short: f64,
    short_ticks: u64,
    long_ticks: u64,
    seed: u64,
) -> Vec<ProcessSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut processes = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let burst = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            let id = next_id(&processes);
            processes.push(
                ProcessSpec::new(id, t as i64, burst as i64).with_priority(rng.random_range(0..5)),
            );
        }
    }

    processes
}

/// Id given to a row added without one: `P{n}` where n is the new length.
pub fn next_id(processes: &[ProcessSpec]) -> String {
    format!("P{}", processes.len() + 1)
}

/// Rejects lists the engine would accept but a user almost certainly did
/// not mean: no processes at all, or two processes sharing an id.
pub fn validate(processes: &[ProcessSpec]) -> Result<()> {
    if processes.is_empty() {
        return Err(Error::NoProcesses);
    }

    let mut seen = FxHashSet::default();
    for process in processes {
        if !seen.insert(process.id.as_str()) {
            return Err(Error::DuplicateProcessId(process.id.clone()));
        }
    }
    Ok(())
}
