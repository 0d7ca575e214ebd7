// Chart service - Fetches metric samples for selected runs and builds chart series
use crate::application::catalog_service::CatalogService;
use crate::application::experiment_repository::ExperimentRepository;
use crate::application::series_builder;
use crate::application::view_repository::ViewRepository;
use crate::domain::run::Run;
use crate::domain::telemetry::ChartData;
use crate::domain::view_context::ViewContext;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChartService {
    repository: Arc<dyn ExperimentRepository>,
    catalog: CatalogService,
    views: Arc<dyn ViewRepository>,
    default_smoothing: i64,
}

impl ChartService {
    pub fn new(
        repository: Arc<dyn ExperimentRepository>,
        views: Arc<dyn ViewRepository>,
        default_smoothing: i64,
    ) -> Self {
        Self {
            catalog: CatalogService::new(repository.clone()),
            repository,
            views,
            default_smoothing,
        }
    }

    /// Build one chart. Without an explicit context the persisted view for the
    /// metric's chart is used, falling back to defaults when there is none or
    /// it cannot be read.
    pub async fn build_chart(
        &self,
        run_ids: &[String],
        metric: &str,
        context: Option<ViewContext>,
    ) -> anyhow::Result<ChartData> {
        let chart_id = ChartData::id_for_metric(metric);
        let context = match context {
            Some(context) => context,
            None => self.resolve_context(&chart_id).await,
        };

        let runs = self.fetch_runs_with_samples(run_ids, metric).await;
        let series = series_builder::build(&runs, &context);

        tracing::info!(
            "Chart {} built: {} runs, {} series",
            chart_id,
            runs.len(),
            series.len()
        );

        Ok(ChartData::new(chart_id, metric.to_string(), series, context))
    }

    async fn resolve_context(&self, chart_id: &str) -> ViewContext {
        let saved = match self.views.load_view(chart_id).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("Unreadable view for chart {}, using defaults: {:#}", chart_id, e);
                None
            }
        };
        saved.unwrap_or_else(|| ViewContext {
            smoothing: self.default_smoothing,
            ..ViewContext::default()
        })
    }

    /// Fetch failures degrade to runs without samples, which build no series.
    async fn fetch_runs_with_samples(&self, run_ids: &[String], metric: &str) -> Vec<Run> {
        if run_ids.is_empty() {
            return Vec::new();
        }

        let mut runs = match self.catalog.find_runs(run_ids).await {
            Ok(runs) => runs,
            Err(e) => {
                tracing::error!("Error fetching runs for metric {}: {:#}", metric, e);
                return Vec::new();
            }
        };

        let samples = match self.repository.fetch_samples(run_ids, metric).await {
            Ok(samples) => samples,
            Err(e) => {
                tracing::error!("Error fetching samples for metric {}: {:#}", metric, e);
                Vec::new()
            }
        };

        let slots: HashMap<String, usize> = runs
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        for run_sample in samples {
            match slots.get(&run_sample.run_id) {
                Some(&i) => runs[i].samples.push(run_sample.sample),
                None => tracing::warn!("Dropping sample for unselected run {}", run_sample.run_id),
            }
        }

        runs
    }
}
