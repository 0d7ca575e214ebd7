// Persisted chart view state
use super::smoothing::clamp_weight;
use super::workload::WorkloadGroup;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// User-chosen display parameters for one chart.
///
/// Fields this version does not know about are kept in `extra` and written
/// back unchanged, so blobs saved by newer clients survive a round trip.
/// `expanded_groups` holds the keys exactly as stored; they are resolved to
/// workloads only when a chart is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewContext {
    #[serde(default)]
    pub smoothing: i64,
    #[serde(default)]
    pub expanded_groups: Vec<String>,
    #[serde(default)]
    pub hidden_series_names: BTreeSet<String>,
    #[serde(default)]
    pub zoom_range: ZoomRange,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewContext {
    pub fn smoothing_weight(&self) -> u8 {
        clamp_weight(self.smoothing)
    }

    /// Expanded keys that name a workload. Keys that do not parse are ignored.
    pub fn expanded_workloads(&self) -> HashSet<WorkloadGroup> {
        self.expanded_groups
            .iter()
            .filter_map(|key| key.parse().ok())
            .collect()
    }

    pub fn is_hidden(&self, series_name: &str) -> bool {
        self.hidden_series_names.contains(series_name)
    }
}
