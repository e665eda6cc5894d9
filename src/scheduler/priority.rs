use super::{Algorithm, JobId, Policy, QueueId, SimCtx, Ticks};

/// Lowest priority value wins at dispatch. Once dispatched a job keeps the
/// CPU until it completes.
pub struct PriorityPolicy {
    ready: QueueId,
}

impl Policy for PriorityPolicy {
    const ALGORITHM: Algorithm = Algorithm::Priority;

    fn init(ctx: &mut SimCtx, _quantum: Ticks) -> Self {
        Self {
            ready: ctx.create_queue_priq(),
        }
    }

    fn ready_queue(&self) -> QueueId {
        self.ready
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, job: JobId) {
        let priority = ctx.job(job).priority;
        ctx.queue_push_priq(self.ready, job, priority);
    }
}
