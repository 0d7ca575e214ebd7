// HTTP error mapping
use crate::application::selection_service::SelectionError;
use crate::infrastructure::file_view_repository::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(selection_err) = err.downcast_ref::<SelectionError>() {
            return match selection_err {
                SelectionError::UnknownRun(_) => ApiError::NotFound(selection_err.to_string()),
                SelectionError::EmptyToggle => ApiError::BadRequest(selection_err.to_string()),
            };
        }
        if let Some(store_err) = err.downcast_ref::<StoreError>() {
            if matches!(store_err, StoreError::InvalidChartId(_)) {
                return ApiError::BadRequest(store_err.to_string());
            }
        }
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(e) => {
                tracing::error!("Request failed: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match &self {
            ApiError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
