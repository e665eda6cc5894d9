use super::{Algorithm, JobId, Policy, QueueId, SimCtx, Ticks, SRTF_PREEMPT_NOTE};

/// Shortest remaining time first.
///
/// Ready jobs are ranked by remaining time at the moment they were enqueued;
/// a queued job never runs, so its rank stays exact while it waits.
pub struct SrtfPolicy {
    ready: QueueId,
}

impl Policy for SrtfPolicy {
    const ALGORITHM: Algorithm = Algorithm::Sjf;

    fn init(ctx: &mut SimCtx, _quantum: Ticks) -> Self {
        Self {
            ready: ctx.create_queue_priq(),
        }
    }

    fn ready_queue(&self) -> QueueId {
        self.ready
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, job: JobId) {
        let remaining = ctx.job(job).remaining;
        ctx.queue_push_priq(self.ready, job, remaining);
    }

    fn preempt(&self, ctx: &SimCtx, running: JobId) -> Option<&'static str> {
        let shortest = ctx.queue_min_key(self.ready)?;
        (shortest < ctx.job(running).remaining).then_some(SRTF_PREEMPT_NOTE)
    }
}
