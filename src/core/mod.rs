pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::{SchedCore, Step};
pub use event::{DoneView, Event, Frame, ReadyView, RunningView};
pub use state::{Job, JobId, JobState, QueueId, RunQueue, SimCtx, Ticks};
