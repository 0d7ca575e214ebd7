// Router and dependency wiring
use crate::application::catalog_service::CatalogService;
use crate::application::chart_service::ChartService;
use crate::application::experiment_repository::ExperimentRepository;
use crate::application::selection_service::SelectionService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::view_repository::ViewRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    build_chart, clear_selection, delete_view, export_chart, get_selection, get_view,
    health_check, list_experiments, list_metrics, list_runs, list_workloads, put_view,
    stream_charts, toggle_selection,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_state(
    repository: Arc<dyn ExperimentRepository>,
    views: Arc<dyn ViewRepository>,
    default_smoothing: i64,
) -> AppState {
    let catalog_service = CatalogService::new(repository.clone());
    let chart_service = ChartService::new(repository, views.clone(), default_smoothing);
    let streaming_service = StreamingDashboardService::new(chart_service.clone());
    let selection_service = SelectionService::new(catalog_service.clone(), views.clone());

    AppState {
        catalog_service,
        chart_service,
        streaming_service,
        selection_service,
        views,
    }
}

pub fn build_router(state: AppState) -> Router {
    // Compression is done per response (and per chunk for streams), so no
    // CompressionLayer here.
    Router::new()
        .route("/healthz", get(health_check))
        .route("/experiments", get(list_experiments))
        .route("/experiments/:id/workloads", get(list_workloads))
        .route("/experiments/:id/runs", get(list_runs))
        .route("/metrics", get(list_metrics))
        .route("/charts", post(build_chart))
        .route("/charts/stream", post(stream_charts))
        .route("/charts/export", post(export_chart))
        .route("/views/:chart_id", get(get_view).put(put_view).delete(delete_view))
        .route("/selection", get(get_selection).delete(clear_selection))
        .route("/selection/toggle", post(toggle_selection))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
