use crate::agent::Converse;
use crate::config::ServiceMode;
use crate::events::TicketmasterClient;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;

use handlers::{chat_handler, health_handler, not_found_handler};

/// What answers the chat endpoint
#[derive(Clone)]
pub enum ChatBackend {
    /// Queries go through an LLM conversation
    Agent(Arc<dyn Converse>),
    /// Queries go straight to the events API
    Direct(TicketmasterClient),
}

impl ChatBackend {
    pub fn mode(&self) -> ServiceMode {
        match self {
            ChatBackend::Agent(_) => ServiceMode::Agent,
            ChatBackend::Direct(_) => ServiceMode::Direct,
        }
    }
}

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub backend: ChatBackend,
}

impl AppState {
    pub fn new(backend: ChatBackend) -> Self {
        Self { backend }
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/chat", get(chat_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
