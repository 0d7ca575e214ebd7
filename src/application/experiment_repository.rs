// Repository trait for experiment telemetry access
use crate::domain::experiment::Experiment;
use crate::domain::run::{Run, Sample};
use async_trait::async_trait;

/// A metric sample tagged with the run it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSample {
    pub run_id: String,
    pub sample: Sample,
}

#[async_trait]
pub trait ExperimentRepository: Send + Sync {
    /// List all experiments
    async fn list_experiments(&self) -> anyhow::Result<Vec<Experiment>>;

    /// List all runs, without samples
    async fn list_runs(&self) -> anyhow::Result<Vec<Run>>;

    /// Metric keys recorded by any of the given runs
    async fn list_metric_keys(&self, run_ids: &[String]) -> anyhow::Result<Vec<String>>;

    /// Samples of one metric for the given runs, in store order
    async fn fetch_samples(&self, run_ids: &[String], metric: &str)
        -> anyhow::Result<Vec<RunSample>>;
}
