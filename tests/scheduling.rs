use sched_sim::{
    core::Event,
    sim::{workload, SegmentKind},
    simulate, Algorithm, ProcessSpec, SimulationResult,
};

fn p(id: &str, arrival: i64, burst: i64) -> ProcessSpec {
    ProcessSpec::new(id, arrival, burst)
}

fn dispatch_order(result: &SimulationResult) -> Vec<&str> {
    result
        .ticks
        .iter()
        .filter_map(|f| match &f.event {
            Event::Dispatch { pid } => Some(pid.as_str()),
            _ => None,
        })
        .collect()
}

fn finish(result: &SimulationResult, pid: &str) -> u64 {
    result.stats_by_pid[pid].finish
}

fn context_frames(result: &SimulationResult) -> usize {
    result
        .ticks
        .iter()
        .filter(|f| matches!(f.event, Event::Context { .. }))
        .count()
}

#[test]
fn same_input_same_result() {
    let processes = workload::bernoulli(60, 0.4, 0.3, 2, 6, 11);
    for algorithm in Algorithm::ALL {
        let first = simulate(&processes, algorithm, 3);
        let second = simulate(&processes, algorithm, 3);
        assert_eq!(first.ticks, second.ticks, "{algorithm}");
        assert_eq!(first.stats_by_pid, second.stats_by_pid, "{algorithm}");
    }
}

fn complete_time(result: &SimulationResult, pid: &str) -> Option<u64> {
    result
        .ticks
        .iter()
        .find(|f| matches!(&f.event, Event::Complete { pid: done } if done == pid))
        .map(|f| f.t)
}

#[test]
fn turnaround_and_wait_are_conserved() {
    let mut processes = workload::classic();
    for mut process in workload::bernoulli(40, 0.3, 0.5, 1, 7, 3) {
        process.id = format!("R{}", process.id);
        processes.push(process);
    }

    for algorithm in Algorithm::ALL {
        let result = simulate(&processes, algorithm, 2);
        assert_eq!(result.stats_by_pid.len(), processes.len());
        for process in &processes {
            let id = &process.id;
            let stats = result.stats_by_pid[id];
            let arrival = process.arrival as u64;
            let burst = process.burst as u64;

            assert_eq!(Some(stats.finish), complete_time(&result, id), "{algorithm} {id}");
            assert_eq!(stats.turnaround, stats.finish - arrival, "{algorithm} {id}");
            assert_eq!(stats.wait, stats.turnaround - burst, "{algorithm} {id}");
            assert!(stats.response.is_some());
        }
    }
}

#[test]
fn fcfs_runs_in_arrival_order() {
    let processes = [p("A", 0, 3), p("B", 1, 3), p("C", 2, 3)];
    let result = simulate(&processes, Algorithm::Fcfs, 2);

    assert_eq!(dispatch_order(&result), ["A", "B", "C"]);
    assert_eq!(context_frames(&result), 0);
    assert_eq!(finish(&result, "A"), 3);
    assert_eq!(finish(&result, "B"), 6);
    assert_eq!(finish(&result, "C"), 9);
}

#[test]
fn srtf_preempts_for_shorter_arrival() {
    let result = simulate(&[p("A", 0, 8), p("B", 1, 4)], Algorithm::Sjf, 2);

    let preempt = result
        .ticks
        .iter()
        .find(|f| matches!(f.event, Event::Context { .. }))
        .expect("preemption frame");
    assert_eq!(preempt.t, 1);
    assert_eq!(preempt.event.pid(), Some("A"));
    assert_eq!(preempt.event.note(), Some("SRTF preempt"));
    assert_eq!(preempt.running.as_ref().map(|r| r.remaining), Some(7));
    let ready: Vec<&str> = preempt.ready.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ready, ["B"]);

    assert_eq!(dispatch_order(&result), ["A", "B", "A"]);
    assert_eq!(finish(&result, "B"), 5);
    assert_eq!(finish(&result, "A"), 12);
}

#[test]
fn srtf_on_classic_workload() {
    let result = simulate(&workload::classic(), Algorithm::Sjf, 2);

    assert_eq!(dispatch_order(&result), ["P1", "P2", "P4", "P1", "P3"]);
    let finishes: Vec<u64> = ["P1", "P2", "P3", "P4"]
        .iter()
        .map(|id| finish(&result, id))
        .collect();
    assert_eq!(finishes, [17, 5, 26, 10]);

    let avg = result.avg.unwrap();
    assert_eq!(avg.wait, 6.5);
    assert_eq!(avg.turnaround, 13.0);
    assert_eq!(avg.response, 4.25);
}

#[test]
fn srtf_does_not_preempt_on_equal_remaining() {
    let result = simulate(&[p("A", 0, 3), p("B", 1, 2)], Algorithm::Sjf, 2);
    assert_eq!(context_frames(&result), 0);
    assert_eq!(dispatch_order(&result), ["A", "B"]);
}

#[test]
fn priority_picks_lowest_value_without_preempting() {
    let result = simulate(
        &[
            p("Z", 0, 3).with_priority(9),
            p("A", 1, 2).with_priority(3),
            p("B", 1, 2).with_priority(1),
            p("C", 1, 2).with_priority(2),
        ],
        Algorithm::Priority,
        2,
    );

    assert_eq!(dispatch_order(&result), ["Z", "B", "C", "A"]);
    assert_eq!(context_frames(&result), 0);
    assert_eq!(finish(&result, "Z"), 3);
    assert_eq!(finish(&result, "B"), 5);
    assert_eq!(finish(&result, "C"), 7);
    assert_eq!(finish(&result, "A"), 9);
}

#[test]
fn priority_ties_keep_ready_order() {
    let processes = [
        p("X", 0, 1).with_priority(1),
        p("Y", 0, 1).with_priority(1),
        p("W", 0, 1),
    ];
    let result = simulate(&processes, Algorithm::Priority, 2);
    // W has no priority and counts as 0
    assert_eq!(dispatch_order(&result), ["W", "X", "Y"]);
}

#[test]
fn round_robin_cycles_fairly() {
    let processes = [p("A", 0, 5), p("B", 0, 5), p("C", 0, 5)];
    let result = simulate(&processes, Algorithm::Rr, 2);

    assert_eq!(
        dispatch_order(&result),
        ["A", "B", "C", "A", "B", "C", "A", "B", "C"]
    );
    assert_eq!(context_frames(&result), 6);
    assert!(result
        .ticks
        .iter()
        .filter(|f| matches!(f.event, Event::Context { .. }))
        .all(|f| f.quantum_left == Some(0)));
    assert_eq!(finish(&result, "A"), 13);
    assert_eq!(finish(&result, "B"), 14);
    assert_eq!(finish(&result, "C"), 15);

    // Response is taken at the first dispatch only
    assert_eq!(result.stats_by_pid["A"].response, Some(0));
    assert_eq!(result.stats_by_pid["B"].response, Some(2));
    assert_eq!(result.stats_by_pid["C"].response, Some(4));
}

#[test]
fn quantum_only_reported_under_round_robin() {
    let processes = [p("A", 0, 3)];
    let rr = simulate(&processes, Algorithm::Rr, 2);
    let first_run = rr
        .ticks
        .iter()
        .find(|f| matches!(f.event, Event::Run { .. }))
        .unwrap();
    assert_eq!(first_run.quantum_left, Some(1));

    let fcfs = simulate(&processes, Algorithm::Fcfs, 2);
    assert!(fcfs.ticks.iter().all(|f| f.quantum_left.is_none()));
}

#[test]
fn idles_until_first_arrival() {
    let result = simulate(&[p("A", 5, 2), p("B", 6, 1)], Algorithm::Fcfs, 2);

    assert!(result.ticks[..5]
        .iter()
        .enumerate()
        .all(|(t, f)| f.event == Event::Idle && f.t == t as u64 && f.running.is_none()));
    assert!(result
        .ticks
        .iter()
        .filter(|f| matches!(f.event, Event::Run { .. }))
        .all(|f| f.t >= 5));

    let first = &result.timeline[0];
    assert_eq!((first.kind, first.duration), (SegmentKind::Idle, 5));
    assert_eq!(result.stats_by_pid["A"].response, Some(0));
}

#[test]
fn empty_input_yields_empty_result() {
    for algorithm in Algorithm::ALL {
        let result = simulate(&[], algorithm, 0);
        assert!(result.empty);
        assert!(result.ticks.is_empty());
        assert!(result.timeline.is_empty());
        assert!(result.stats_by_pid.is_empty());
        assert!(result.avg.is_none());
    }

    let json = serde_json::to_value(simulate(&[], Algorithm::Rr, 2)).unwrap();
    let expected = serde_json::json!({
        "ticks": [],
        "timeline": [],
        "statsByPid": {},
        "avg": null,
        "empty": true,
    });
    assert_eq!(json, expected);
}

#[test]
fn malformed_numbers_are_clamped() {
    let processes = [p("A", -3, 0).with_priority(-1), p("B", 0, -7)];
    let result = simulate(&processes, Algorithm::Rr, 0);

    assert!(!result.empty);
    assert_eq!(finish(&result, "A"), 1);
    assert_eq!(finish(&result, "B"), 2);
    assert_eq!(result.stats_by_pid["B"].wait, 1);
}

#[test]
fn timeline_covers_every_frame() {
    for algorithm in Algorithm::ALL {
        let result = simulate(&workload::classic(), algorithm, 3);
        let total: u64 = result.timeline.iter().map(|s| s.duration).sum();
        assert_eq!(total, result.ticks.len() as u64);
        assert_eq!(result.timeline.last().map(|s| s.end), Some(total));
        assert!(result
            .timeline
            .windows(2)
            .all(|w| (w[0].kind, &w[0].label) != (w[1].kind, &w[1].label)));
    }
}

#[test]
fn done_list_grows_in_completion_order() {
    let result = simulate(&workload::classic(), Algorithm::Sjf, 2);
    let last = result.ticks.last().unwrap();
    assert!(matches!(last.event, Event::Complete { .. }));
    let done: Vec<(&str, u64)> = last.done.iter().map(|d| (d.id.as_str(), d.finish)).collect();
    assert_eq!(done, [("P2", 5), ("P4", 10), ("P1", 17), ("P3", 26)]);
    assert!(last.ready.is_empty());
}

#[test]
fn stats_follow_arrival_then_id_order() {
    let processes = [p("b", 1, 1), p("a", 1, 1), p("c", 0, 1)];
    let result = simulate(&processes, Algorithm::Fcfs, 2);
    let order: Vec<&str> = result.stats_by_pid.keys().map(String::as_str).collect();
    assert_eq!(order, ["c", "a", "b"]);
}
