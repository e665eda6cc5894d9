use tracing::debug;

use super::{
    job::{normalize, ProcessSpec},
    report::SimulationResult,
};
use crate::{
    core::{
        driver::{SchedCore, Step},
        state::Ticks,
    },
    scheduler::Policy,
};

/// One simulation run: a fresh scheduling core loaded with a workload.
pub struct Sim<P: Policy> {
    pub core: SchedCore<P>,
    finished: bool,
}

impl<P: Policy> Sim<P> {
    pub fn new(processes: &[ProcessSpec], quantum: Ticks) -> Self {
        let mut core = SchedCore::<P>::new(quantum);
        for job in normalize(processes) {
            core.ctx.create_job(job.id, job.arrival, job.burst, job.priority);
        }

        Self {
            core,
            finished: false,
        }
    }

    /// Advances the decision loop once. Returns `false` once every job is done.
    pub fn step(&mut self) -> bool {
        if !self.finished {
            self.finished = self.core.step() == Step::Finished;
        }
        !self.finished
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core.ctx.jobs.iter().all(|job| job.finished())
    }

    pub fn run(mut self) -> SimulationResult {
        while self.step() {}
        debug_assert!(self.all_jobs_completed(), "Simulation ended with unfinished jobs");

        let (ctx, frames) = self.core.into_parts();
        let result = SimulationResult::from_run(&ctx, frames);
        debug!(
            algorithm = %P::ALGORITHM,
            jobs = ctx.jobs.len(),
            frames = result.ticks.len(),
            makespan = result.makespan(),
            "simulation finished"
        );
        result
    }
}
