use super::error::{ApiError, ApiResult};
use super::{AppState, ChatBackend};
use crate::events::{EventList, EventQuery, EventSearchResult};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::info;

/// Query parameters of `/api/v1/chat`; which ones are required depends on the mode
#[derive(Debug, Default, Deserialize)]
pub struct ChatParams {
    /// Free-text request (agent mode)
    pub query: Option<String>,
    /// City to search (direct mode)
    pub city: Option<String>,
    /// Optional keyword (direct mode)
    pub keyword: Option<String>,
}

/// Handler for `GET /api/v1/chat`
pub async fn chat_handler(
    State(state): State<AppState>,
    Query(params): Query<ChatParams>,
) -> ApiResult<Response> {
    match &state.backend {
        ChatBackend::Agent(converser) => {
            let query = required(params.query, "query")?;
            info!("Chat query received in agent mode");

            let answer = converser.converse(&query).await?;
            Ok(Json(answer).into_response())
        }
        ChatBackend::Direct(events) => {
            let city = required(params.city, "city")?;
            let query = EventQuery::new(city, params.keyword);
            info!("Chat query received in direct mode for {}", query.city);

            match events.find_events(&query).await? {
                EventSearchResult::Empty => Err(ApiError::no_events()),
                EventSearchResult::Found(events) => Ok(Json(EventList { events }).into_response()),
            }
        }
    }
}

/// Handler for the health check
pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}

/// Handler for unknown routes
pub async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing_parameter(name))
}
