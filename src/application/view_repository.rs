// Repository trait for persisted chart views and run selections
use crate::domain::selection::Selection;
use crate::domain::view_context::ViewContext;
use async_trait::async_trait;

#[async_trait]
pub trait ViewRepository: Send + Sync {
    /// Load the view saved for a chart, if any
    async fn load_view(&self, chart_id: &str) -> anyhow::Result<Option<ViewContext>>;

    /// Store a chart view verbatim
    async fn save_view(&self, chart_id: &str, context: &ViewContext) -> anyhow::Result<()>;

    /// Forget a chart view; returns whether one existed
    async fn delete_view(&self, chart_id: &str) -> anyhow::Result<bool>;

    async fn load_selection(&self) -> anyhow::Result<Selection>;

    async fn save_selection(&self, selection: &Selection) -> anyhow::Result<()>;
}
