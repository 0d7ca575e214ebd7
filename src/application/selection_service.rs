// Selection service - Toggling and persisting the runs picked for charting
use crate::application::catalog_service::CatalogService;
use crate::application::view_repository::ViewRepository;
use crate::domain::selection::Selection;
use crate::domain::workload::WorkloadGroup;
use serde::Deserialize;
use std::sync::Arc;

/// One user click in the run picker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub workload: Option<WorkloadGroup>,
    pub run_id: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SelectionError {
    #[error("toggle request names neither a workload nor a run")]
    EmptyToggle,
    #[error("run {0} does not exist")]
    UnknownRun(String),
}

#[derive(Clone)]
pub struct SelectionService {
    catalog: CatalogService,
    views: Arc<dyn ViewRepository>,
}

impl SelectionService {
    pub fn new(catalog: CatalogService, views: Arc<dyn ViewRepository>) -> Self {
        Self { catalog, views }
    }

    pub async fn current(&self) -> anyhow::Result<Selection> {
        self.views.load_selection().await
    }

    /// Apply a toggle and persist the result.
    ///
    /// A run id toggles that run; a bare workload toggles all of its runs, and a
    /// bare unsorted workload removes every unsorted run from the selection.
    pub async fn toggle(&self, request: ToggleRequest) -> anyhow::Result<Selection> {
        let mut selection = self.views.load_selection().await?;

        match (request.run_id, request.workload) {
            (Some(run_id), _) => {
                let run = self
                    .catalog
                    .find_runs(std::slice::from_ref(&run_id))
                    .await?
                    .pop()
                    .ok_or(SelectionError::UnknownRun(run_id))?;
                selection.toggle_run(run);
            }
            (None, Some(group)) if group.is_ungrouped() => selection.clear_ungrouped(),
            (None, Some(group)) => {
                let catalog = self.catalog.list_runs().await?;
                selection.toggle_workload(&group, &catalog);
            }
            (None, None) => return Err(SelectionError::EmptyToggle.into()),
        }

        self.views.save_selection(&selection).await?;
        tracing::info!("Selection now holds {} runs", selection.runs.len());
        Ok(selection)
    }

    pub async fn clear(&self) -> anyhow::Result<Selection> {
        let mut selection = self.views.load_selection().await?;
        selection.clear();
        self.views.save_selection(&selection).await?;
        Ok(selection)
    }
}
