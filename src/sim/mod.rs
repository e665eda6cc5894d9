pub mod driver;
pub mod job;
pub mod report;
pub mod workload;

pub use driver::Sim;
pub use job::{Pid, ProcessSpec};
pub use report::{Averages, GanttSegment, SegmentKind, SimulationResult, Stats};

use crate::{
    core::state::Ticks,
    scheduler::{Algorithm, FcfsPolicy, PriorityPolicy, RoundRobinPolicy, SrtfPolicy},
};

/// Runs `processes` under `algorithm` to completion.
///
/// Never fails: out-of-range numbers are clamped (arrival to 0, burst and
/// `quantum` to 1, priority to 0) and an empty list yields
/// [`SimulationResult::empty`]. Each call works on its own state, so equal
/// inputs always produce equal results.
pub fn simulate(
    processes: &[ProcessSpec],
    algorithm: Algorithm,
    quantum: Ticks,
) -> SimulationResult {
    if processes.is_empty() {
        return SimulationResult::empty();
    }

    match algorithm {
        Algorithm::Fcfs => Sim::<FcfsPolicy>::new(processes, quantum).run(),
        Algorithm::Sjf => Sim::<SrtfPolicy>::new(processes, quantum).run(),
        Algorithm::Priority => Sim::<PriorityPolicy>::new(processes, quantum).run(),
        Algorithm::Rr => Sim::<RoundRobinPolicy>::new(processes, quantum).run(),
    }
}
