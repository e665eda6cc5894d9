use super::{
    event::{DoneView, Event, Frame, ReadyView, RunningView},
    state::{JobId, JobState, QueueId, SimCtx, Ticks},
};

/// What the CPU slot looked like when an event was recorded.
///
/// Normally this mirrors `SimCtx::running`, but a completing job has already
/// left the CPU by the time its frame is taken and is still reported here.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuView {
    pub job: Option<JobId>,
    pub quantum_left: Option<Ticks>,
}

impl CpuView {
    pub fn of(ctx: &SimCtx) -> Self {
        Self {
            job: ctx.running,
            quantum_left: ctx.running.and(ctx.quantum_left),
        }
    }
}

/// Records one [`Frame`] per event and checks job ownership as it goes.
#[derive(Debug, Default)]
pub struct Observer {
    frames: Vec<Frame>,
}

impl Observer {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn observe(&mut self, ctx: &SimCtx, ready: QueueId, cpu: CpuView, event: Event) {
        self.check_ownership(ctx);

        let running = cpu.job.map(|job_id| {
            let job = ctx.job(job_id);
            RunningView {
                id: job.pid.clone(),
                remaining: job.remaining,
            }
        });

        let ready = ctx
            .queue_members(ready)
            .into_iter()
            .map(|job_id| {
                let job = ctx.job(job_id);
                ReadyView {
                    id: job.pid.clone(),
                    remaining: job.remaining,
                    priority: job.priority,
                }
            })
            .collect();

        let done = ctx
            .queue_members(ctx.done_id)
            .into_iter()
            .map(|job_id| {
                let job = ctx.job(job_id);
                DoneView {
                    id: job.pid.clone(),
                    finish: job.finish.unwrap_or(ctx.now),
                }
            })
            .collect();

        self.frames.push(Frame {
            t: ctx.now,
            event,
            running,
            quantum_left: cpu.job.and(cpu.quantum_left),
            ready,
            done,
        });
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    fn check_ownership(&self, ctx: &SimCtx) {
        if let Some(job_id) = ctx.running {
            let job = ctx.job(job_id);
            debug_assert_eq!(
                job.state,
                JobState::Running,
                "CPU job {} must be Running",
                job.pid
            );
            debug_assert!(
                !ctx.job_in_any_queue(job_id),
                "Running job {} must not appear in any queue",
                job.pid
            );
        }

        for (&job_id, &queue_id) in &ctx.job_to_queue {
            let job = ctx.job(job_id);
            let expected = if queue_id == ctx.pending_id {
                JobState::Pending
            } else if queue_id == ctx.done_id {
                JobState::Done
            } else {
                JobState::Ready
            };
            debug_assert_eq!(
                job.state, expected,
                "Job {} state disagrees with its queue {queue_id:?}",
                job.pid
            );
            if let Some(queue) = ctx.queues.get(queue_id) {
                debug_assert!(
                    queue.contains(job_id),
                    "job_to_queue claims job {} in queue {queue_id:?}, but queue does not contain it",
                    job.pid
                );
            } else {
                debug_assert!(false, "job_to_queue references unknown queue {queue_id:?}");
            }
        }
    }
}
