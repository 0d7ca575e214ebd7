// HTTP request handlers
use crate::domain::experiment::Experiment;
use crate::domain::run::Run;
use crate::domain::selection::Selection;
use crate::domain::telemetry::series_to_csv;
use crate::domain::view_context::ViewContext;
use crate::domain::workload::WorkloadGroup;
use crate::application::catalog_service::{RunEntry, WorkloadEntry};
use crate::application::selection_service::ToggleRequest;
use crate::infrastructure::chunked_stream::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, csv_response, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RunsQuery {
    pub workload: Option<String>,
}

#[derive(Deserialize)]
pub struct MetricsQuery {
    #[serde(default)]
    pub runs: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    /// Defaults to the persisted selection
    pub run_ids: Option<Vec<String>>,
    pub metric: String,
    pub context: Option<ViewContext>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    pub run_ids: Option<Vec<String>>,
    pub metrics: Vec<String>,
    pub context: Option<ViewContext>,
}

/// Selected runs plus the workloads they belong to, in selection order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub runs: Vec<Run>,
    pub selected_workloads: Vec<WorkloadGroup>,
}

impl From<Selection> for SelectionResponse {
    fn from(selection: Selection) -> Self {
        Self {
            selected_workloads: selection.selected_workloads(),
            runs: selection.runs,
        }
    }
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn resolve_run_ids(state: &AppState, run_ids: Option<Vec<String>>) -> Result<Vec<String>, ApiError> {
    match run_ids {
        Some(ids) => Ok(ids),
        None => Ok(state.selection_service.current().await?.run_ids()),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_experiments(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let experiments = match state.catalog_service.list_experiments().await {
        Ok(experiments) => experiments,
        Err(e) => {
            tracing::error!("Error fetching experiments: {:#}", e);
            Vec::<Experiment>::new()
        }
    };
    respond(&experiments, &headers).await
}

pub async fn list_workloads(
    Path(experiment_id): Path<i64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let workloads = match state.catalog_service.list_workloads(experiment_id).await {
        Ok(workloads) => workloads,
        Err(e) => {
            tracing::error!("Error fetching workloads of {}: {:#}", experiment_id, e);
            Vec::<WorkloadEntry>::new()
        }
    };
    respond(&workloads, &headers).await
}

pub async fn list_runs(
    Path(experiment_id): Path<i64>,
    Query(query): Query<RunsQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let workload = query
        .workload
        .map(|w| w.parse::<WorkloadGroup>())
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now_ms = chrono::Utc::now().timestamp_millis();
    let runs = match state
        .catalog_service
        .list_run_entries(experiment_id, workload.as_ref(), now_ms)
        .await
    {
        Ok(runs) => runs,
        Err(e) => {
            tracing::error!("Error fetching runs of {}: {:#}", experiment_id, e);
            Vec::<RunEntry>::new()
        }
    };
    Ok(respond(&runs, &headers).await)
}

pub async fn list_metrics(
    Query(query): Query<MetricsQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let run_ids: Vec<String> = query
        .runs
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let metrics = match state.catalog_service.list_metrics(&run_ids).await {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::error!("Error fetching metrics: {:#}", e);
            Vec::new()
        }
    };
    respond(&metrics, &headers).await
}

pub async fn build_chart(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChartRequest>,
) -> Result<Response, ApiError> {
    let run_ids = resolve_run_ids(&state, request.run_ids).await?;
    let chart = state
        .chart_service
        .build_chart(&run_ids, &request.metric, request.context)
        .await?;
    Ok(respond(&chart, &headers).await)
}

/// Stream several charts for the same runs (progressive loading)
pub async fn stream_charts(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<StreamRequest>,
) -> Result<Response, ApiError> {
    let run_ids = resolve_run_ids(&state, request.run_ids).await?;
    let rx = state
        .streaming_service
        .stream_charts(run_ids, request.metrics, request.context);
    Ok(stream_from_receiver(rx, accepts_brotli(&headers)).into_response())
}

pub async fn export_chart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChartRequest>,
) -> Result<Response, ApiError> {
    let run_ids = resolve_run_ids(&state, request.run_ids).await?;
    let chart = state
        .chart_service
        .build_chart(&run_ids, &request.metric, request.context)
        .await?;
    Ok(csv_response(series_to_csv(&chart.series)).into_response())
}

pub async fn get_view(
    Path(chart_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ViewContext>, ApiError> {
    state
        .views
        .load_view(&chart_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no saved view for chart {}", chart_id)))
}

pub async fn put_view(
    Path(chart_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(context): Json<ViewContext>,
) -> Result<Json<ViewContext>, ApiError> {
    state.views.save_view(&chart_id, &context).await?;
    Ok(Json(context))
}

pub async fn delete_view(
    Path(chart_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    if state.views.delete_view(&chart_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("no saved view for chart {}", chart_id)))
    }
}

pub async fn get_selection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SelectionResponse>, ApiError> {
    Ok(Json(state.selection_service.current().await?.into()))
}

pub async fn toggle_selection(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<SelectionResponse>, ApiError> {
    Ok(Json(state.selection_service.toggle(request).await?.into()))
}

pub async fn clear_selection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SelectionResponse>, ApiError> {
    Ok(Json(state.selection_service.clear().await?.into()))
}
