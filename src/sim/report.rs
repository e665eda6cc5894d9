use average::{Estimate, Mean};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::job::Pid;
use crate::core::{
    event::{Event, Frame},
    state::{SimCtx, Ticks},
};

pub const IDLE_LABEL: &str = "IDLE";
pub const CTX_LABEL: &str = "CTX";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Run,
    Idle,
    Ctx,
}

/// A run of consecutive frames sharing the same label and kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttSegment {
    pub label: String,
    /// Frame cursor just past the last frame of this segment.
    pub end: u64,
    pub duration: u64,
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub finish: Ticks,
    pub wait: Ticks,
    pub turnaround: Ticks,
    pub response: Option<Ticks>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    pub wait: f64,
    pub turnaround: f64,
    pub response: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub ticks: Vec<Frame>,
    pub timeline: Vec<GanttSegment>,
    pub stats_by_pid: IndexMap<Pid, Stats>,
    pub avg: Option<Averages>,
    pub empty: bool,
}

impl SimulationResult {
    pub fn empty() -> Self {
        Self {
            ticks: Vec::new(),
            timeline: Vec::new(),
            stats_by_pid: IndexMap::new(),
            avg: None,
            empty: true,
        }
    }

    pub fn from_run(ctx: &SimCtx, ticks: Vec<Frame>) -> Self {
        let stats_by_pid = stats(ctx);
        let avg = averages(stats_by_pid.values());
        Self {
            timeline: timeline(&ticks),
            ticks,
            stats_by_pid,
            avg,
            empty: false,
        }
    }

    /// Last clock value reached by the run.
    pub fn makespan(&self) -> Ticks {
        self.stats_by_pid
            .values()
            .map(|s| s.finish)
            .max()
            .unwrap_or(0)
    }
}

fn segment_of(frame: &Frame) -> (SegmentKind, &str) {
    match &frame.event {
        Event::Idle => (SegmentKind::Idle, IDLE_LABEL),
        Event::Context { .. } => (SegmentKind::Ctx, CTX_LABEL),
        _ => (
            SegmentKind::Run,
            frame
                .running
                .as_ref()
                .map_or(IDLE_LABEL, |r| r.id.as_str()),
        ),
    }
}

/// Run-length encodes frames into Gantt segments.
pub fn timeline(frames: &[Frame]) -> Vec<GanttSegment> {
    let mut segments: Vec<GanttSegment> = Vec::new();
    let mut cursor = 0;

    for frame in frames {
        let (kind, label) = segment_of(frame);
        cursor += 1;
        match segments.last_mut() {
            Some(seg) if seg.kind == kind && seg.label == label => {
                seg.duration += 1;
                seg.end = cursor;
            }
            _ => segments.push(GanttSegment {
                label: label.to_string(),
                end: cursor,
                duration: 1,
                kind,
            }),
        }
    }

    segments
}

// Stats keyed by pid in job order; a repeated pid keeps its last job
fn stats(ctx: &SimCtx) -> IndexMap<Pid, Stats> {
    ctx.jobs
        .iter()
        .map(|job| {
            let finish = job.finish.unwrap_or(ctx.now);
            let turnaround = finish.saturating_sub(job.arrival);
            let stats = Stats {
                finish,
                wait: turnaround.saturating_sub(job.burst),
                turnaround,
                response: job.first_start.map(|start| start - job.arrival),
            };
            (job.pid.clone(), stats)
        })
        .collect()
}

fn averages<'a>(stats: impl ExactSizeIterator<Item = &'a Stats> + Clone) -> Option<Averages> {
    if stats.len() == 0 {
        return None;
    }

    let mean = |f: fn(&Stats) -> f64| stats.clone().map(f).collect::<Mean>().estimate();
    Some(Averages {
        wait: mean(|s| s.wait as f64),
        turnaround: mean(|s| s.turnaround as f64),
        response: mean(|s| s.response.unwrap_or(0) as f64),
    })
}
