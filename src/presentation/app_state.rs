// Application state for HTTP handlers
use crate::application::catalog_service::CatalogService;
use crate::application::chart_service::ChartService;
use crate::application::selection_service::SelectionService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::view_repository::ViewRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub chart_service: ChartService,
    pub streaming_service: StreamingDashboardService,
    pub selection_service: SelectionService,
    pub views: Arc<dyn ViewRepository>,
}
