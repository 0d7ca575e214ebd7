// Catalog service - Experiments, workloads, runs and metric keys for pickers
use crate::application::experiment_repository::ExperimentRepository;
use crate::domain::experiment::Experiment;
use crate::domain::run::{Run, RunStatus};
use crate::domain::time_format::{format_duration, how_long_ago};
use crate::domain::workload::{format_group_label, WorkloadGroup};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEntry {
    pub key: WorkloadGroup,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunEntry {
    pub id: String,
    pub identifier: String,
    pub workload: WorkloadGroup,
    pub status: RunStatus,
    pub start_time: i64,
    pub started: String,
    pub duration: Option<String>,
    pub model: String,
    pub params: String,
    pub source: String,
}

impl RunEntry {
    fn from_run(run: &Run, now_ms: i64) -> Self {
        Self {
            id: run.id.clone(),
            identifier: run.display_identifier(),
            workload: run.workload_group.clone(),
            status: run.status,
            start_time: run.start_time,
            started: how_long_ago(run.start_time, now_ms),
            duration: run.duration_ms.and_then(format_duration),
            model: run.model.clone(),
            params: run.params.clone(),
            source: run.source.clone(),
        }
    }
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn ExperimentRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ExperimentRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_experiments(&self) -> anyhow::Result<Vec<Experiment>> {
        let mut experiments = self.repository.list_experiments().await?;
        experiments.sort_by_key(|e| e.id);
        Ok(experiments)
    }

    /// All runs, with their experiment names filled in.
    pub async fn list_runs(&self) -> anyhow::Result<Vec<Run>> {
        let (experiments, mut runs) = futures::try_join!(
            self.repository.list_experiments(),
            self.repository.list_runs()
        )?;

        for run in &mut runs {
            if let Some(experiment) = experiments.iter().find(|e| e.id == run.experiment_id) {
                run.experiment_name = experiment.name.clone();
            }
        }

        Ok(runs)
    }

    /// Workloads of an experiment ordered by workload number, unsorted runs last.
    pub async fn list_workloads(&self, experiment_id: i64) -> anyhow::Result<Vec<WorkloadEntry>> {
        let runs = self.repository.list_runs().await?;

        let mut groups: Vec<WorkloadGroup> = Vec::new();
        for run in runs.into_iter().filter(|r| r.experiment_id == experiment_id) {
            if !groups.contains(&run.workload_group) {
                groups.push(run.workload_group);
            }
        }
        groups.sort_by(compare_workloads);

        Ok(groups
            .into_iter()
            .map(|key| WorkloadEntry {
                label: format_group_label(&key),
                key,
            })
            .collect())
    }

    /// Runs of an experiment, optionally one workload, newest first.
    pub async fn list_run_entries(
        &self,
        experiment_id: i64,
        workload: Option<&WorkloadGroup>,
        now_ms: i64,
    ) -> anyhow::Result<Vec<RunEntry>> {
        let mut runs: Vec<Run> = self
            .repository
            .list_runs()
            .await?
            .into_iter()
            .filter(|r| r.experiment_id == experiment_id)
            .filter(|r| workload.is_none_or(|w| &r.workload_group == w))
            .collect();
        runs.sort_by(|a, b| b.start_time.cmp(&a.start_time));

        Ok(runs.iter().map(|r| RunEntry::from_run(r, now_ms)).collect())
    }

    /// Sorted, de-duplicated metric keys recorded by the runs.
    pub async fn list_metrics(&self, run_ids: &[String]) -> anyhow::Result<Vec<String>> {
        if run_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut keys = self.repository.list_metric_keys(run_ids).await?;
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    /// Runs with the given ids, in the order the ids were given.
    pub async fn find_runs(&self, run_ids: &[String]) -> anyhow::Result<Vec<Run>> {
        let runs = self.list_runs().await?;
        Ok(run_ids
            .iter()
            .filter_map(|id| runs.iter().find(|r| &r.id == id).cloned())
            .collect())
    }
}

fn compare_workloads(a: &WorkloadGroup, b: &WorkloadGroup) -> Ordering {
    let (x, y) = (a.workload_number(), b.workload_number());
    a.is_ungrouped()
        .cmp(&b.is_ungrouped())
        .then_with(|| x.is_none().cmp(&y.is_none()))
        .then_with(|| match (x, y) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fakes::FakeExperimentRepository;
    use crate::domain::run::fixtures::run;
    use pretty_assertions::assert_eq;

    fn service(failing: bool) -> CatalogService {
        let mut newest = run("run-new", "3-10", &[(9_000, 1.0)]);
        newest.label = Some("A".to_string());
        let repository = FakeExperimentRepository {
            experiments: vec![
                Experiment::new(4, "vit".to_string()),
                Experiment::new(3, "resnet".to_string()),
            ],
            runs: vec![
                run("run-old", "3-2", &[(1_000, 1.0)]),
                run("run-unsorted", "3-null", &[(2_000, 1.0)]),
                newest,
                run("run-other", "4-1", &[(5_000, 1.0)]),
            ],
            metric: "gpu_util".to_string(),
            failing,
        };
        CatalogService::new(Arc::new(repository))
    }

    #[tokio::test]
    async fn test_experiments_sorted_by_id() {
        let experiments = service(false).list_experiments().await.unwrap();
        let ids: Vec<i64> = experiments.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_workloads_sorted_numerically_unsorted_last() {
        let workloads = service(false).list_workloads(3).await.unwrap();
        let labels: Vec<&str> = workloads.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, vec!["Workload 3-2", "Workload 3-10", "Unsorted Runs"]);
    }

    #[test]
    fn test_mixed_workload_keys_sort_consistently() {
        let mut groups: Vec<WorkloadGroup> = ["3-10a", "3-null", "3-9", "3-beta", "3-10", "3-2.5"]
            .iter()
            .map(|k| k.parse().unwrap())
            .collect();
        groups.sort_by(compare_workloads);
        let keys: Vec<String> = groups.iter().map(|g| g.key()).collect();
        assert_eq!(keys, vec!["3-2.5", "3-9", "3-10", "3-10a", "3-beta", "3-null"]);

        for a in &groups {
            for b in &groups {
                assert_eq!(compare_workloads(a, b), compare_workloads(b, a).reverse());
                for c in &groups {
                    if compare_workloads(a, b).is_le() && compare_workloads(b, c).is_le() {
                        assert!(compare_workloads(a, c).is_le(), "{} {} {}", a, b, c);
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_run_entries_newest_first() {
        let entries = service(false)
            .list_run_entries(3, None, 10_000)
            .await
            .unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["run-new", "run-unsorted", "run-old"]);
        assert_eq!(entries[0].identifier, "A");
        assert_eq!(entries[0].started, "1 second ago");
        assert_eq!(entries[0].duration.as_deref(), Some("00:01:00"));
        assert_eq!(entries[2].identifier, "run-ol");
    }

    #[tokio::test]
    async fn test_run_entries_for_one_workload() {
        let group: WorkloadGroup = "3-2".parse().unwrap();
        let entries = service(false)
            .list_run_entries(3, Some(&group), 10_000)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "run-old");
    }

    #[tokio::test]
    async fn test_find_runs_attaches_experiment_names() {
        let ids = vec!["run-other".to_string(), "missing".to_string(), "run-old".to_string()];
        let runs = service(false).find_runs(&ids).await.unwrap();
        let names: Vec<(&str, &str)> = runs
            .iter()
            .map(|r| (r.id.as_str(), r.experiment_name.as_str()))
            .collect();
        assert_eq!(names, vec![("run-other", "vit"), ("run-old", "resnet")]);
    }

    #[tokio::test]
    async fn test_metrics_deduplicated_and_empty_selection_short_circuits() {
        let service = service(false);
        let metrics = service.list_metrics(&["run-old".to_string()]).await.unwrap();
        assert_eq!(metrics, vec!["gpu_util"]);

        let failing = self::service(true);
        assert!(failing.list_metrics(&[]).await.unwrap().is_empty());
        assert!(failing.list_metrics(&["run-old".to_string()]).await.is_err());
    }
}
