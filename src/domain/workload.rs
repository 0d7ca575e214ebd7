// Workload group domain model
//
// The data store has encoded "no workload" as null, "null", -1 and 0 at
// different times. All of those are resolved into `WorkloadGroup::Ungrouped`
// here, once, so nothing downstream ever looks at raw sentinel values.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const UNGROUPED_MARKERS: [&str; 4] = ["", "null", "-1", "0"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkloadGroup {
    Grouped { experiment_id: i64, workload: String },
    Ungrouped { experiment_id: i64 },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseWorkloadKeyError {
    #[error("workload key `{0}` has no experiment prefix")]
    MissingPrefix(String),
    #[error("workload key `{0}` has a non-numeric experiment id")]
    InvalidExperiment(String),
}

impl WorkloadGroup {
    /// Resolve the raw `workload` column of a run row.
    pub fn from_raw(experiment_id: i64, raw: &Value) -> Self {
        match raw {
            Value::Number(n) => Self::from_workload_str(experiment_id, &n.to_string()),
            Value::String(s) => Self::from_workload_str(experiment_id, s),
            _ => WorkloadGroup::Ungrouped { experiment_id },
        }
    }

    fn from_workload_str(experiment_id: i64, workload: &str) -> Self {
        let workload = workload.trim();
        if UNGROUPED_MARKERS.contains(&workload) {
            WorkloadGroup::Ungrouped { experiment_id }
        } else {
            WorkloadGroup::Grouped {
                experiment_id,
                workload: workload.to_string(),
            }
        }
    }

    pub fn experiment_id(&self) -> i64 {
        match self {
            WorkloadGroup::Grouped { experiment_id, .. } => *experiment_id,
            WorkloadGroup::Ungrouped { experiment_id } => *experiment_id,
        }
    }

    pub fn is_ungrouped(&self) -> bool {
        matches!(self, WorkloadGroup::Ungrouped { .. })
    }

    /// Numeric workload, used for ordering workload listings.
    pub fn workload_number(&self) -> Option<f64> {
        match self {
            WorkloadGroup::Grouped { workload, .. } => workload.parse().ok(),
            WorkloadGroup::Ungrouped { .. } => None,
        }
    }

    /// Prefix for per-run series names: "3-1" for a workload, "3" for unsorted runs.
    pub fn run_name_base(&self) -> String {
        match self {
            WorkloadGroup::Grouped {
                experiment_id,
                workload,
            } => format!("{}-{}", experiment_id, workload),
            WorkloadGroup::Ungrouped { experiment_id } => experiment_id.to_string(),
        }
    }

    /// Canonical persisted key.
    pub fn key(&self) -> String {
        match self {
            WorkloadGroup::Grouped { .. } => self.run_name_base(),
            WorkloadGroup::Ungrouped { experiment_id } => format!("{}-null", experiment_id),
        }
    }
}

/// Display label shared by the workload listing and series naming.
pub fn format_group_label(group: &WorkloadGroup) -> String {
    match group {
        WorkloadGroup::Ungrouped { .. } => "Unsorted Runs".to_string(),
        WorkloadGroup::Grouped { .. } => format!("Workload {}", group.key()),
    }
}

impl fmt::Display for WorkloadGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for WorkloadGroup {
    type Err = ParseWorkloadKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (experiment, workload) = s
            .split_once('-')
            .ok_or_else(|| ParseWorkloadKeyError::MissingPrefix(s.to_string()))?;
        let experiment_id = experiment
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseWorkloadKeyError::InvalidExperiment(s.to_string()))?;
        Ok(Self::from_workload_str(experiment_id, workload))
    }
}

impl Serialize for WorkloadGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for WorkloadGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}
