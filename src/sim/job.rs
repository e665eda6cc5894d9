use serde::{Deserialize, Serialize};

use crate::core::state::Ticks;

pub type Pid = String;

/// A process as supplied by the user. Values are taken as-is and clamped
/// when the simulation normalizes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub id: Pid,
    #[serde(default)]
    pub arrival: i64,
    #[serde(default = "default_burst")]
    pub burst: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

fn default_burst() -> i64 {
    1
}

impl ProcessSpec {
    pub fn new(id: impl Into<Pid>, arrival: i64, burst: i64) -> Self {
        Self {
            id: id.into(),
            arrival,
            burst,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn normalized(&self) -> NormalizedSpec {
        NormalizedSpec {
            id: self.id.clone(),
            arrival: self.arrival.max(0) as Ticks,
            burst: self.burst.max(1) as Ticks,
            priority: self.priority.unwrap_or(0).max(0) as u64,
        }
    }
}

/// A process after clamping: arrival >= 0, burst >= 1, priority >= 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSpec {
    pub id: Pid,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: u64,
}

/// Normalizes and orders processes by `(arrival, id)`.
pub fn normalize(processes: &[ProcessSpec]) -> Vec<NormalizedSpec> {
    let mut jobs: Vec<NormalizedSpec> = processes.iter().map(ProcessSpec::normalized).collect();
    jobs.sort_by(|a, b| a.arrival.cmp(&b.arrival).then_with(|| a.id.cmp(&b.id)));
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        let job = ProcessSpec::new("P1", -4, 0).with_priority(-2).normalized();
        assert_eq!(job.arrival, 0);
        assert_eq!(job.burst, 1);
        assert_eq!(job.priority, 0);
    }

    #[test]
    fn missing_priority_counts_as_zero() {
        assert_eq!(ProcessSpec::new("P1", 0, 3).normalized().priority, 0);
    }

    #[test]
    fn orders_by_arrival_then_id() {
        let jobs = normalize(&[
            ProcessSpec::new("B", 1, 1),
            ProcessSpec::new("C", 0, 1),
            ProcessSpec::new("A", 1, 1),
        ]);
        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["C", "A", "B"]);
    }

    #[test]
    fn deserializes_with_defaults() {
        let spec: ProcessSpec = serde_json::from_str(r#"{"id": "P9"}"#).unwrap();
        assert_eq!(spec, ProcessSpec::new("P9", 0, 1));
    }
}
