// PostgREST repository implementation
use crate::application::experiment_repository::{ExperimentRepository, RunSample};
use crate::domain::experiment::Experiment;
use crate::domain::run::{Run, RunStatus, Sample};
use crate::domain::workload::WorkloadGroup;
use crate::infrastructure::config::{EndpointSettings, PostgrestSettings};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("failed to reach PostgREST at {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("PostgREST request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode PostgREST response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Deserialize)]
struct ExperimentRow {
    experiment_id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RunRow {
    run_uuid: String,
    experiment_id: i64,
    #[serde(default)]
    workload: serde_json::Value,
    letter: Option<String>,
    duration: Option<i64>,
    start_time: i64,
    status: RunStatus,
    model: Option<String>,
    params: Option<String>,
    data: Option<String>,
}

impl RunRow {
    fn into_run(self) -> Run {
        Run {
            workload_group: WorkloadGroup::from_raw(self.experiment_id, &self.workload),
            id: self.run_uuid,
            experiment_id: self.experiment_id,
            experiment_name: String::new(),
            label: Run::normalize_label(self.letter),
            duration_ms: self.duration,
            start_time: self.start_time,
            status: self.status,
            model: self.model.unwrap_or_default(),
            params: self.params.unwrap_or_default(),
            source: self.data.unwrap_or_default(),
            samples: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MetricKeyRow {
    key: String,
}

#[derive(Debug, Deserialize)]
struct MetricRow {
    run_uuid: String,
    step: i64,
    timestamp: i64,
    value: f64,
}

#[derive(Debug, Clone)]
pub struct PostgrestRepository {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    endpoints: EndpointSettings,
}

impl PostgrestRepository {
    pub fn new(settings: PostgrestSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token,
            endpoints: settings.endpoints,
        })
    }

    fn build_url(&self, endpoint: &str, filters: &str) -> String {
        format!("{}/{}{}", self.base_url, endpoint, filters)
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        filters: &str,
    ) -> Result<Vec<T>, RepositoryError> {
        let url = self.build_url(endpoint, filters);
        tracing::debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| RepositoryError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Status { url, status, body });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|source| RepositoryError::Decode { url, source })
    }
}

/// `?run_uuid=in.("a","b")`
fn run_filter(run_ids: &[String]) -> String {
    let quoted: Vec<String> = run_ids
        .iter()
        .map(|id| format!("\"{}\"", urlencoding::encode(id)))
        .collect();
    format!("?run_uuid=in.({})", quoted.join(","))
}

fn metric_filter(run_ids: &[String], metric: &str) -> String {
    format!("{}&key=eq.{}", run_filter(run_ids), urlencoding::encode(metric))
}

#[async_trait]
impl ExperimentRepository for PostgrestRepository {
    async fn list_experiments(&self) -> anyhow::Result<Vec<Experiment>> {
        let rows: Vec<ExperimentRow> = self.fetch_rows(&self.endpoints.experiments, "").await?;
        Ok(rows
            .into_iter()
            .map(|r| Experiment::new(r.experiment_id, r.name))
            .collect())
    }

    async fn list_runs(&self) -> anyhow::Result<Vec<Run>> {
        let rows: Vec<RunRow> = self.fetch_rows(&self.endpoints.runs, "").await?;
        tracing::debug!("Fetched {} runs", rows.len());
        Ok(rows.into_iter().map(RunRow::into_run).collect())
    }

    async fn list_metric_keys(&self, run_ids: &[String]) -> anyhow::Result<Vec<String>> {
        if run_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<MetricKeyRow> = self
            .fetch_rows(&self.endpoints.metrics_available, &run_filter(run_ids))
            .await?;
        Ok(rows.into_iter().map(|r| r.key).collect())
    }

    async fn fetch_samples(
        &self,
        run_ids: &[String],
        metric: &str,
    ) -> anyhow::Result<Vec<RunSample>> {
        if run_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<MetricRow> = self
            .fetch_rows(&self.endpoints.metrics, &metric_filter(run_ids, metric))
            .await?;

        tracing::debug!("Fetched {} samples of {}", rows.len(), metric);
        Ok(rows
            .into_iter()
            .map(|r| RunSample {
                run_id: r.run_uuid,
                sample: Sample::new(r.timestamp, r.value, r.step),
            })
            .collect())
    }
}
