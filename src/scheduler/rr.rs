use super::{Algorithm, JobId, Policy, QueueId, SimCtx, Ticks};

/// FIFO with a fixed slice; a job whose slice runs out re-enters at the tail.
pub struct RoundRobinPolicy {
    ready: QueueId,
    quantum: Ticks,
}

impl Policy for RoundRobinPolicy {
    const ALGORITHM: Algorithm = Algorithm::Rr;

    fn init(ctx: &mut SimCtx, quantum: Ticks) -> Self {
        Self {
            ready: ctx.ready_id,
            quantum: quantum.max(1),
        }
    }

    fn ready_queue(&self) -> QueueId {
        self.ready
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, job: JobId) {
        ctx.queue_push_fifo(self.ready, job);
    }

    fn slice(&self) -> Option<Ticks> {
        Some(self.quantum)
    }
}
