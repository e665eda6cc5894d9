//! Frame playback.
//!
//! A simulation is computed eagerly; playback only walks the finished frame
//! list. [`Cursor`] steps through it synchronously, [`spawn`] drives it from a
//! timer task that can be paused, single-stepped, re-timed and cancelled.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, Interval, MissedTickBehavior},
};
use tracing::debug;

use crate::core::event::Frame;

#[derive(Debug)]
pub struct Cursor<'a> {
    frames: &'a [Frame],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(frames: &'a [Frame]) -> Self {
        Self {
            frames,
            position: 0,
        }
    }

    pub fn step(&mut self) -> Option<&'a Frame> {
        let frame = self.frames.get(self.position)?;
        self.position += 1;
        Some(frame)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.frames.len()
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = &'a Frame;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Pause,
    Resume,
    Step,
    SetInterval(Duration),
    Stop,
}

/// Control side of a running playback task.
///
/// Dropping the handle stops playback.
#[derive(Debug)]
pub struct PlaybackHandle {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<usize>,
}

impl PlaybackHandle {
    pub fn pause(&self) {
        self.send(Command::Pause);
    }

    pub fn resume(&self) {
        self.send(Command::Resume);
    }

    /// Pauses and delivers exactly one frame.
    pub fn step(&self) {
        self.send(Command::Step);
    }

    pub fn set_interval(&self, interval: Duration) {
        self.send(Command::SetInterval(interval));
    }

    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    /// Waits for playback to end and returns how many frames were delivered.
    pub async fn join(self) -> Result<usize, tokio::task::JoinError> {
        let Self { commands, task } = self;
        let delivered = task.await;
        drop(commands);
        delivered
    }

    fn send(&self, command: Command) {
        // The task is gone once playback ended; nothing left to control
        let _ = self.commands.send(command);
    }
}

fn ticker(period: Duration) -> Interval {
    let period = period.max(Duration::from_millis(1));
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Replays `frames` into `sink`, one per `interval`.
///
/// With `autoplay` unset the task starts paused and waits for
/// [`PlaybackHandle::resume`] or [`PlaybackHandle::step`]. The task ends when
/// every frame was delivered, on [`PlaybackHandle::stop`], or when either the
/// handle or the receiving side of `sink` is dropped.
pub fn spawn(
    frames: Arc<[Frame]>,
    interval: Duration,
    autoplay: bool,
    sink: mpsc::Sender<Frame>,
) -> PlaybackHandle {
    let (commands, mut rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        let mut position = 0;
        let mut playing = autoplay;
        let mut timer = ticker(interval);

        while position < frames.len() {
            tokio::select! {
                command = rx.recv() => {
                    let Some(command) = command else { break };
                    debug!(?command, position, "playback command");
                    match command {
                        Command::Pause => playing = false,
                        Command::Resume => {
                            playing = true;
                            timer.reset();
                        }
                        Command::Step => {
                            playing = false;
                            if sink.send(frames[position].clone()).await.is_err() {
                                break;
                            }
                            position += 1;
                        }
                        Command::SetInterval(period) => timer = ticker(period),
                        Command::Stop => break,
                    }
                }
                _ = timer.tick(), if playing => {
                    if sink.send(frames[position].clone()).await.is_err() {
                        break;
                    }
                    position += 1;
                }
            }
        }

        debug!(delivered = position, total = frames.len(), "playback ended");
        position
    });

    PlaybackHandle { commands, task }
}
