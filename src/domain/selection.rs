// Run selection domain model
use super::run::Run;
use super::workload::WorkloadGroup;
use serde::{Deserialize, Serialize};

/// Runs a user has picked for charting, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub runs: Vec<Run>,
}

impl Selection {
    pub fn contains(&self, run_id: &str) -> bool {
        self.runs.iter().any(|r| r.id == run_id)
    }

    pub fn run_ids(&self) -> Vec<String> {
        self.runs.iter().map(|r| r.id.clone()).collect()
    }

    pub fn toggle_run(&mut self, run: Run) {
        if self.contains(&run.id) {
            self.runs.retain(|r| r.id != run.id);
        } else {
            self.runs.push(run);
        }
    }

    /// Select every catalog run of `group`, or deselect them all if any is selected.
    pub fn toggle_workload(&mut self, group: &WorkloadGroup, catalog: &[Run]) {
        if self.runs.iter().any(|r| &r.workload_group == group) {
            self.runs.retain(|r| &r.workload_group != group);
            return;
        }

        for run in catalog.iter().filter(|r| &r.workload_group == group) {
            if !self.contains(&run.id) {
                self.runs.push(Run {
                    samples: Vec::new(),
                    ..run.clone()
                });
            }
        }
    }

    pub fn clear_ungrouped(&mut self) {
        self.runs.retain(|r| !r.workload_group.is_ungrouped());
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }

    pub fn selected_workloads(&self) -> Vec<WorkloadGroup> {
        let mut groups: Vec<WorkloadGroup> = Vec::new();
        for run in &self.runs {
            if !groups.contains(&run.workload_group) {
                groups.push(run.workload_group.clone());
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::run::fixtures::run;

    fn catalog() -> Vec<Run> {
        vec![
            run("run-a", "3-1", &[]),
            run("run-b", "3-1", &[]),
            run("run-c", "3-2", &[]),
            run("run-d", "3-null", &[]),
        ]
    }

    #[test]
    fn test_toggle_run() {
        let catalog = catalog();
        let mut selection = Selection::default();

        selection.toggle_run(catalog[0].clone());
        assert_eq!(selection.run_ids(), vec!["run-a"]);

        selection.toggle_run(catalog[0].clone());
        assert!(selection.runs.is_empty());
    }

    #[test]
    fn test_toggle_workload_adds_missing_then_removes_all() {
        let catalog = catalog();
        let group: WorkloadGroup = "3-1".parse().unwrap();
        let mut selection = Selection::default();
        selection.toggle_run(catalog[2].clone());

        selection.toggle_workload(&group, &catalog);
        assert_eq!(selection.run_ids(), vec!["run-c", "run-a", "run-b"]);

        selection.toggle_workload(&group, &catalog);
        assert_eq!(selection.run_ids(), vec!["run-c"]);
    }

    #[test]
    fn test_clear_ungrouped_and_workloads() {
        let catalog = catalog();
        let mut selection = Selection::default();
        for r in &catalog {
            selection.toggle_run(r.clone());
        }
        assert_eq!(selection.selected_workloads().len(), 3);

        selection.clear_ungrouped();
        assert_eq!(selection.run_ids(), vec!["run-a", "run-b", "run-c"]);
        assert_eq!(
            selection.selected_workloads(),
            vec!["3-1".parse().unwrap(), "3-2".parse::<WorkloadGroup>().unwrap()]
        );

        selection.clear();
        assert!(selection.runs.is_empty());
    }
}
