use tracing::trace;

use super::{
    event::{Event, Frame},
    observer::{CpuView, Observer},
    state::{JobId, SimCtx, Ticks},
};
use crate::scheduler::{Policy, QUANTUM_EXPIRED_NOTE};

/// Outcome of one pass through the decision loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finished,
}

pub struct SchedCore<P: Policy> {
    pub ctx: SimCtx,
    pub policy: P,
    observer: Observer,
}

impl<P: Policy> SchedCore<P> {
    pub fn new(quantum: Ticks) -> Self {
        let mut ctx = SimCtx::new();
        let policy = P::init(&mut ctx, quantum);
        Self {
            ctx,
            policy,
            observer: Observer::new(),
        }
    }

    /// One pass of the decision loop: admit, dispatch or idle, run one unit,
    /// then apply preemption and completion.
    pub fn step(&mut self) -> Step {
        self.admit_arrivals();

        let job = match self.ctx.running {
            Some(job) => job,
            None => {
                if self.ctx.queue_is_empty(self.policy.ready_queue()) {
                    return match self.next_arrival() {
                        Some(at) => {
                            self.idle_until(at);
                            Step::Continue
                        }
                        None => Step::Finished,
                    };
                }
                match self.dispatch() {
                    Some(job) => job,
                    None => return Step::Finished,
                }
            }
        };

        self.run_unit(job);
        self.ctx.advance_time(1);
        self.admit_arrivals();

        // Preemption wins over completion
        if let Some(note) = self.policy.preempt(&self.ctx, job) {
            self.requeue(job, note);
            return Step::Continue;
        }

        if self.ctx.job(job).remaining == 0 {
            self.complete(job);
            return Step::Continue;
        }

        if self.ctx.quantum_left == Some(0) {
            self.requeue(job, QUANTUM_EXPIRED_NOTE);
        }

        Step::Continue
    }

    // Move every pending job whose arrival has come into the ready queue
    fn admit_arrivals(&mut self) {
        let pending = self.ctx.pending_id;
        while let Some(job) = self.ctx.queue_front(pending) {
            if self.ctx.job(job).arrival > self.ctx.now {
                break;
            }
            self.ctx.queue_pop(pending);
            self.ctx.mark_ready(job);
            self.policy.enqueue(&mut self.ctx, job);

            trace!(t = self.ctx.now, pid = %self.ctx.job(job).pid, "arrival");
            let pid = self.ctx.job(job).pid.clone();
            self.emit(Event::Arrival { pid });
        }
    }

    fn next_arrival(&self) -> Option<Ticks> {
        self.ctx
            .queue_front(self.ctx.pending_id)
            .map(|job| self.ctx.job(job).arrival)
    }

    fn idle_until(&mut self, at: Ticks) {
        while self.ctx.now < at {
            self.emit(Event::Idle);
            self.ctx.advance_time(1);
        }
    }

    fn dispatch(&mut self) -> Option<JobId> {
        let job = self.policy.pick(&mut self.ctx)?;
        self.ctx.set_running(job);

        let now = self.ctx.now;
        let entry = self.ctx.job_mut(job);
        if !entry.started() {
            entry.first_start = Some(now);
        }
        let pid = entry.pid.clone();
        self.ctx.quantum_left = self.policy.slice();

        trace!(t = now, pid = %pid, "dispatch");
        self.emit(Event::Dispatch { pid });
        Some(job)
    }

    fn run_unit(&mut self, job: JobId) {
        let entry = self.ctx.job_mut(job);
        entry.remaining = entry.remaining.saturating_sub(1);
        let pid = entry.pid.clone();
        if let Some(left) = self.ctx.quantum_left.as_mut() {
            *left = left.saturating_sub(1);
        }
        self.emit(Event::Run { pid });
    }

    // Evict the running job back to the tail of the ready queue
    fn requeue(&mut self, job: JobId, note: &'static str) {
        let pid = self.ctx.job(job).pid.clone();
        trace!(t = self.ctx.now, pid = %pid, note, "context switch");
        self.emit(Event::Context {
            pid,
            note: Some(note.to_string()),
        });

        self.ctx.clear_cpu();
        self.ctx.mark_ready(job);
        self.policy.enqueue(&mut self.ctx, job);
    }

    fn complete(&mut self, job: JobId) {
        let cpu = CpuView::of(&self.ctx);
        self.ctx.clear_cpu();
        self.ctx.mark_done(job, self.ctx.now);

        let pid = self.ctx.job(job).pid.clone();
        trace!(t = self.ctx.now, pid = %pid, "complete");
        self.observer.observe(
            &self.ctx,
            self.policy.ready_queue(),
            cpu,
            Event::Complete { pid },
        );
    }

    fn emit(&mut self, event: Event) {
        let cpu = CpuView::of(&self.ctx);
        self.observer.observe(&self.ctx, self.policy.ready_queue(), cpu, event);
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn into_parts(self) -> (SimCtx, Vec<Frame>) {
        (self.ctx, self.observer.into_frames())
    }
}
