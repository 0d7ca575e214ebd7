// File-backed view repository: one JSON document per chart, plus the selection
use crate::application::view_repository::ViewRepository;
use crate::domain::selection::Selection;
use crate::domain::view_context::ViewContext;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SELECTION_FILE: &str = "selection.json";
const VIEW_PREFIX: &str = "view-";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid chart id `{0}`")]
    InvalidChartId(String),
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct FileViewRepository {
    dir: PathBuf,
}

impl FileViewRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn view_path(&self, chart_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !chart_id.is_empty()
            && chart_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidChartId(chart_id.to_string()));
        }
        Ok(self.dir.join(format!("{}{}.json", VIEW_PREFIX, chart_id)))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write to a sibling temp file and rename over the target.
    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl ViewRepository for FileViewRepository {
    async fn load_view(&self, chart_id: &str) -> anyhow::Result<Option<ViewContext>> {
        let path = self.view_path(chart_id)?;
        Ok(Self::read_json(&path).await?)
    }

    async fn save_view(&self, chart_id: &str, context: &ViewContext) -> anyhow::Result<()> {
        let path = self.view_path(chart_id)?;
        self.write_json(&path, context).await?;
        tracing::debug!("Saved view {} to {}", chart_id, path.display());
        Ok(())
    }

    async fn delete_view(&self, chart_id: &str) -> anyhow::Result<bool> {
        let path = self.view_path(chart_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io { path, source }.into()),
        }
    }

    async fn load_selection(&self) -> anyhow::Result<Selection> {
        let path = self.dir.join(SELECTION_FILE);
        Ok(Self::read_json(&path).await?.unwrap_or_default())
    }

    async fn save_selection(&self, selection: &Selection) -> anyhow::Result<()> {
        let path = self.dir.join(SELECTION_FILE);
        if selection.runs.is_empty() {
            return match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(StoreError::Io { path, source }.into()),
            };
        }
        self.write_json(&path, selection).await?;
        Ok(())
    }
}
