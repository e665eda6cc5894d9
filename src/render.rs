//! Plain-text views of a simulation: one log line per frame, a Gantt strip
//! and the statistics table.

use std::fmt::Write;

use crate::{
    core::event::{Event, Frame},
    sim::{GanttSegment, SegmentKind, SimulationResult},
};

pub fn log_line(frame: &Frame) -> String {
    let t = frame.t;
    match &frame.event {
        Event::Arrival { pid } => format!("t={t}: {pid} arrived"),
        Event::Dispatch { pid } => format!("t={t}: dispatch {pid} to CPU"),
        Event::Run { pid } => format!("t={t}: running {pid}"),
        Event::Complete { pid } => format!("t={t}: {pid} completed"),
        Event::Context { note: Some(note), .. } => format!("t={t}: context switch ({note})"),
        Event::Context { note: None, .. } => format!("t={t}: context switch"),
        Event::Idle => format!("t={t}: CPU idle"),
    }
}

/// CPU, ready queue and done list as they stand after `frame`.
pub fn machine_state(frame: &Frame) -> String {
    let cpu = match (&frame.event, &frame.running) {
        (Event::Idle, _) => "IDLE".to_string(),
        (_, Some(running)) => match frame.quantum_left {
            Some(q) => format!("{} (rt:{}, q:{q})", running.id, running.remaining),
            None => format!("{} (rt:{})", running.id, running.remaining),
        },
        (_, None) => "-".to_string(),
    };

    let ready: Vec<String> = frame
        .ready
        .iter()
        .map(|r| format!("{}(rt:{}, pr:{})", r.id, r.remaining, r.priority))
        .collect();
    let done: Vec<String> = frame
        .done
        .iter()
        .map(|d| format!("{}(ft:{})", d.id, d.finish))
        .collect();

    format!(
        "cpu={cpu} ready=[{}] done=[{}]",
        ready.join(", "),
        done.join(", ")
    )
}

pub fn gantt(timeline: &[GanttSegment]) -> String {
    let mut bar = String::from("|");
    for segment in timeline {
        let label = match segment.kind {
            SegmentKind::Run => segment.label.clone(),
            SegmentKind::Idle => "..".to_string(),
            SegmentKind::Ctx => "<>".to_string(),
        };
        let width = (segment.duration as usize * 3).max(label.len() + 2);
        let _ = write!(bar, "{label:^width$}|");
    }

    let total: u64 = timeline.iter().map(|s| s.duration).sum();
    let scale: Vec<String> = (0..=total).map(|k| k.to_string()).collect();
    format!("{bar}\n{}", scale.join(" "))
}

pub fn stats_table(result: &SimulationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:>6} {:>6} {:>6} {:>6}", "PID", "FT", "WT", "TAT", "RT");
    for (pid, stats) in &result.stats_by_pid {
        let response = stats
            .response
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        let _ = writeln!(
            out,
            "{pid:<8} {:>6} {:>6} {:>6} {response:>6}",
            stats.finish, stats.wait, stats.turnaround
        );
    }
    if let Some(avg) = &result.avg {
        let _ = writeln!(
            out,
            "{:<8} {:>6} {:>6.2} {:>6.2} {:>6.2}",
            "Average", "", avg.wait, avg.turnaround, avg.response
        );
    }
    out
}
