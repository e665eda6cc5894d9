use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::collections::VecDeque;

// Index into Job Vec
pub type JobId = usize;
pub type Ticks = u64;
new_key_type! {
    pub struct QueueId;
}

/// Ordering key of a job inside a priority run queue.
///
/// `key` is whatever the policy ranks by (remaining time, priority value);
/// `seq` is the admission sequence number, so equal keys fall back to the
/// order in which jobs entered the queue.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct Rank {
    pub key: u64,
    pub seq: u64,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Rank's Ord
impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Ready,
    Running,
    Done,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub pid: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: u64,
    pub state: JobState,
    pub remaining: Ticks,
    pub first_start: Option<Ticks>,
    pub finish: Option<Ticks>,
}

impl Job {
    pub fn started(&self) -> bool {
        self.first_start.is_some()
    }

    pub fn finished(&self) -> bool {
        self.finish.is_some()
    }
}

#[derive(Debug)]
pub enum RunQueue {
    Fifo {
        jobs: VecDeque<JobId>,
    },
    Priq {
        jobs: KeyedPriorityQueue<JobId, Rank>,
    },
}

impl RunQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            jobs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            jobs: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, job_id: JobId) -> bool {
        match self {
            Self::Fifo { jobs } => jobs.contains(&job_id),
            Self::Priq { jobs } => jobs.get_priority(&job_id).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { jobs } => jobs.len(),
            Self::Priq { jobs } => jobs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members in the order they were admitted.
    pub fn members(&self) -> Vec<JobId> {
        match self {
            Self::Fifo { jobs } => jobs.iter().copied().collect(),
            Self::Priq { jobs } => {
                let mut ranked: Vec<(u64, JobId)> =
                    jobs.iter().map(|(job, rank)| (rank.seq, *job)).collect();
                ranked.sort_unstable();
                ranked.into_iter().map(|(_, job)| job).collect()
            }
        }
    }
}

/// Working state of one simulation run.
///
/// Every job is owned by exactly one place at a time: one of the queues in
/// `queues` (tracked by `job_to_queue`) or the CPU slot in `running`.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub jobs: Vec<Job>,
    pub queues: SlotMap<QueueId, RunQueue>,
    pub job_to_queue: FxHashMap<JobId, QueueId>,
    pub pending_id: QueueId,
    pub ready_id: QueueId,
    pub done_id: QueueId,
    pub running: Option<JobId>,
    pub quantum_left: Option<Ticks>,

    // Increment upon every queue push
    next_seq: u64,
}

impl Default for SimCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl SimCtx {
    pub fn new() -> Self {
        let mut queues = SlotMap::with_capacity_and_key(3);
        let pending_id = queues.insert(RunQueue::new_fifo());
        let ready_id = queues.insert(RunQueue::new_fifo());
        let done_id = queues.insert(RunQueue::new_fifo());

        Self {
            now: 0,
            jobs: Vec::new(),
            queues,
            job_to_queue: FxHashMap::default(),
            pending_id,
            ready_id,
            done_id,
            running: None,
            quantum_left: None,
            next_seq: 0,
        }
    }

    /// Registers a job and parks it on the pending queue.
    ///
    /// Jobs must be created in arrival order; the pending queue is FIFO.
    pub fn create_job(
        &mut self,
        pid: String,
        arrival: Ticks,
        burst: Ticks,
        priority: u64,
    ) -> JobId {
        let id = self.jobs.len();
        debug_assert!(
            self.jobs.last().is_none_or(|prev| prev.arrival <= arrival),
            "Job {pid} created out of arrival order"
        );

        self.jobs.push(Job {
            id,
            pid,
            arrival,
            burst,
            priority,
            state: JobState::Pending,
            remaining: burst,
            first_start: None,
            finish: None,
        });
        self.queue_push_fifo(self.pending_id, id);

        id
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn create_queue_priq(&mut self) -> QueueId {
        self.queues.insert(RunQueue::new_priq())
    }

    fn queue_push(&mut self, queue_id: QueueId, job_id: JobId, key: Option<u64>) {
        assert!(
            !self.job_to_queue.contains_key(&job_id),
            "Job {job_id} already present in some queue"
        );
        debug_assert_ne!(
            self.running,
            Some(job_id),
            "Job {job_id} must leave the CPU before it is enqueued"
        );

        let seq = self.next_seq;
        self.next_seq += 1;
        let queue = self.queues.get_mut(queue_id).expect("Unknown queue");

        match queue {
            RunQueue::Fifo { jobs } => jobs.push_back(job_id),
            RunQueue::Priq { jobs } => {
                jobs.push(
                    job_id,
                    Rank {
                        key: key.expect("Attempted to push to a priority queue with no key"),
                        seq,
                    },
                );
            }
        };

        self.job_to_queue.insert(job_id, queue_id);
    }

    pub fn queue_push_fifo(&mut self, queue_id: QueueId, job_id: JobId) {
        self.queue_push(queue_id, job_id, None);
    }

    pub fn queue_push_priq(&mut self, queue_id: QueueId, job_id: JobId, key: u64) {
        self.queue_push(queue_id, job_id, Some(key));
    }

    pub fn queue_pop(&mut self, queue_id: QueueId) -> Option<JobId> {
        let queue = self.queues.get_mut(queue_id)?;
        let job = match queue {
            RunQueue::Fifo { jobs } => jobs.pop_front(),
            RunQueue::Priq { jobs } => jobs.pop().map(|(job, _)| job),
        }?;

        let removed = self.job_to_queue.remove(&job);
        debug_assert!(removed.is_some(), "Job {job} missing queue membership");

        Some(job)
    }

    /// The job `queue_pop` would return, without removing it.
    pub fn queue_front(&self, queue_id: QueueId) -> Option<JobId> {
        match self.queues.get(queue_id)? {
            RunQueue::Fifo { jobs } => jobs.front().copied(),
            RunQueue::Priq { jobs } => jobs.peek().map(|(job, _)| *job),
        }
    }

    /// Smallest rank key in a priority queue. FIFO queues carry no keys.
    pub fn queue_min_key(&self, queue_id: QueueId) -> Option<u64> {
        match self.queues.get(queue_id)? {
            RunQueue::Fifo { .. } => None,
            RunQueue::Priq { jobs } => jobs.peek().map(|(_, rank)| rank.key),
        }
    }

    pub fn queue_members(&self, queue_id: QueueId) -> Vec<JobId> {
        self.queues
            .get(queue_id)
            .map(RunQueue::members)
            .unwrap_or_default()
    }

    pub fn queue_is_empty(&self, queue_id: QueueId) -> bool {
        self.queues.get(queue_id).is_none_or(RunQueue::is_empty)
    }

    pub fn job_in_any_queue(&self, job_id: JobId) -> bool {
        self.job_to_queue.contains_key(&job_id)
    }

    pub fn job(&self, job_id: JobId) -> &Job {
        &self.jobs[job_id]
    }

    pub fn job_mut(&mut self, job_id: JobId) -> &mut Job {
        &mut self.jobs[job_id]
    }

    pub fn mark_ready(&mut self, job_id: JobId) {
        let job = self.job_mut(job_id);
        debug_assert!(
            job.state != JobState::Done,
            "Finished job {} cannot be ready",
            job.pid
        );
        job.state = JobState::Ready;
    }

    pub fn set_running(&mut self, job_id: JobId) {
        debug_assert!(
            !self.job_to_queue.contains_key(&job_id),
            "Running job {job_id} must not be enqueued"
        );
        debug_assert!(self.running.is_none(), "CPU already running a job");

        self.running = Some(job_id);
        self.job_mut(job_id).state = JobState::Running;
    }

    /// Empties the CPU slot, returning the job that held it.
    pub fn clear_cpu(&mut self) -> Option<JobId> {
        self.quantum_left = None;
        self.running.take()
    }

    pub fn mark_done(&mut self, job_id: JobId, finish: Ticks) {
        debug_assert_ne!(
            self.running,
            Some(job_id),
            "Job {job_id} must leave the CPU before it completes"
        );

        let job = &mut self.jobs[job_id];
        debug_assert!(
            job.state == JobState::Running,
            "Job {} must have been running before marked done",
            job.pid
        );

        job.state = JobState::Done;
        job.remaining = 0;
        job.finish = Some(finish);
        self.queue_push_fifo(self.done_id, job_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_smallest_key_first() {
        let mut queue = KeyedPriorityQueue::new();
        queue.push(0usize, Rank { key: 5, seq: 0 });
        queue.push(1usize, Rank { key: 2, seq: 1 });
        queue.push(2usize, Rank { key: 2, seq: 2 });

        assert_eq!(queue.pop().map(|(job, _)| job), Some(1));
        assert_eq!(queue.pop().map(|(job, _)| job), Some(2));
        assert_eq!(queue.pop().map(|(job, _)| job), Some(0));
    }

    #[test]
    fn priq_members_follow_admission_order() {
        let mut ctx = SimCtx::new();
        let priq = ctx.create_queue_priq();
        let a = ctx.create_job("A".into(), 0, 4, 0);
        let b = ctx.create_job("B".into(), 0, 1, 0);
        ctx.queue_pop(ctx.pending_id);
        ctx.queue_pop(ctx.pending_id);

        ctx.queue_push_priq(priq, a, 4);
        ctx.queue_push_priq(priq, b, 1);

        assert_eq!(ctx.queue_members(priq), vec![a, b]);
        assert_eq!(ctx.queue_front(priq), Some(b));
        assert_eq!(ctx.queue_min_key(priq), Some(1));
    }

    #[test]
    fn job_moves_through_owners() {
        let mut ctx = SimCtx::new();
        let job = ctx.create_job("P1".into(), 0, 2, 0);
        assert!(ctx.job_in_any_queue(job));

        assert_eq!(ctx.queue_pop(ctx.pending_id), Some(job));
        ctx.mark_ready(job);
        ctx.queue_push_fifo(ctx.ready_id, job);
        assert_eq!(ctx.queue_pop(ctx.ready_id), Some(job));

        ctx.set_running(job);
        assert!(!ctx.job_in_any_queue(job));
        assert_eq!(ctx.clear_cpu(), Some(job));

        ctx.mark_done(job, 2);
        assert_eq!(ctx.job(job).state, JobState::Done);
        assert_eq!(ctx.job(job).finish, Some(2));
        assert_eq!(ctx.queue_members(ctx.done_id), vec![job]);
    }

    #[test]
    #[should_panic(expected = "already present")]
    fn double_enqueue_is_rejected() {
        let mut ctx = SimCtx::new();
        let job = ctx.create_job("P1".into(), 0, 1, 0);
        let ready = ctx.ready_id;
        ctx.queue_push_fifo(ready, job);
    }
}
