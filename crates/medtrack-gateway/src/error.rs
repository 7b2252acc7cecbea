use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use medtrack_engine::ScheduleError;
use medtrack_store::StoreError;

/// Request-level failures, each mapped to an HTTP status.
///
/// Validation problems are 400s with a human-readable reason; a missing
/// schedule is a 404 (a distinct outcome, not a validation failure); any
/// storage fault is a 500 with the detail kept server-side.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("user ID must be positive")]
    InvalidUserId,

    #[error("schedule ID must be positive")]
    InvalidScheduleId,

    #[error("medication cannot be empty")]
    InvalidMedication,

    #[error("invalid data in request: {0}")]
    InvalidRequest(String),

    #[error("invalid schedule: {0}")]
    Validation(#[from] ScheduleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidUserId
            | ApiError::InvalidScheduleId
            | ApiError::InvalidMedication
            | ApiError::InvalidRequest(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::ScheduleNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {self}");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
