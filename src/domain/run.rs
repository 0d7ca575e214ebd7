// Run and metric sample domain models
use super::workload::WorkloadGroup;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: i64,
    pub value: f64,
    pub step: i64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64, step: i64) -> Self {
        Self {
            timestamp,
            value,
            step,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: String,
    pub experiment_id: i64,
    #[serde(default)]
    pub experiment_name: String,
    pub workload_group: WorkloadGroup,
    pub label: Option<String>,
    pub duration_ms: Option<i64>,
    pub start_time: i64,
    pub status: RunStatus,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub params: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<Sample>,
}

impl Run {
    /// Store rows use "0" and "" for runs without a letter.
    pub fn normalize_label(label: Option<String>) -> Option<String> {
        label.filter(|l| {
            let l = l.trim();
            !l.is_empty() && l != "0"
        })
    }

    pub fn short_id(&self, len: usize) -> String {
        self.id.chars().take(len).collect()
    }

    /// Identifier shown in run pickers: the letter if any, otherwise the id head.
    pub fn display_identifier(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.short_id(6),
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            id: self.id.clone(),
            experiment_id: self.experiment_id,
            experiment_name: self.experiment_name.clone(),
            label: self.label.clone(),
            model: self.model.clone(),
            params: self.params.clone(),
            source: self.source.clone(),
            status: self.status,
        }
    }
}

/// Run metadata carried by a series for tooltips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub id: String,
    pub experiment_id: i64,
    pub experiment_name: String,
    pub label: Option<String>,
    pub model: String,
    pub params: String,
    pub source: String,
    pub status: RunStatus,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(Run::normalize_label(Some("0".to_string())), None);
        assert_eq!(Run::normalize_label(Some("  ".to_string())), None);
        assert_eq!(Run::normalize_label(None), None);
        assert_eq!(
            Run::normalize_label(Some("B".to_string())),
            Some("B".to_string())
        );
    }

    #[test]
    fn test_display_identifier() {
        let mut run = fixtures::run("a1b2c3d4e5", "1-2", &[]);
        assert_eq!(run.display_identifier(), "a1b2c3");

        run.label = Some("C".to_string());
        assert_eq!(run.display_identifier(), "C");
    }

    #[test]
    fn test_status_wire_format() {
        let status: RunStatus = serde_json::from_str("\"RUNNING\"").unwrap();
        assert_eq!(status, RunStatus::Running);
        assert_eq!(serde_json::to_string(&RunStatus::Failed).unwrap(), "\"FAILED\"");
    }
}
