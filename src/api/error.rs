use crate::error::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

/// Detail returned when a direct-mode search finds nothing
pub const NO_EVENTS_DETAIL: &str = "No events in the given city.";

/// Error answered to HTTP clients as `{"detail": ...}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn no_events() -> Self {
        Self::new(StatusCode::NOT_FOUND, NO_EVENTS_DETAIL)
    }

    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Missing required query parameter: {}", name),
        )
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidQuery(message) => {
                warn!("Rejected query: {}", message);
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            err if err.is_upstream_unavailable() => {
                error!("Events API request failed: {}", err);
                ApiError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("External API request failed: {}", err),
                )
            }
            err => {
                error!("Unexpected error: {:?}", err);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Unexpected error: {}", err),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
