use super::{Algorithm, JobId, Policy, QueueId, SimCtx, Ticks};

pub struct FcfsPolicy {
    ready: QueueId,
}

impl Policy for FcfsPolicy {
    const ALGORITHM: Algorithm = Algorithm::Fcfs;

    fn init(ctx: &mut SimCtx, _quantum: Ticks) -> Self {
        Self {
            ready: ctx.ready_id,
        }
    }

    fn ready_queue(&self) -> QueueId {
        self.ready
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, job: JobId) {
        ctx.queue_push_fifo(self.ready, job);
    }
}
