use crate::agent::GeminiConverser;
use crate::api::{self, AppState, ChatBackend};
use crate::config::{Config, ServiceMode};
use crate::error::{Error, ServiceResult};
use crate::events::TicketmasterClient;
use crate::shutdown::shutdown_signal;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the service configuration
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Assemble the shared request state for the configured mode
pub fn build_state(config: &Config) -> ServiceResult<AppState> {
    let events = TicketmasterClient::from_config(config)?;

    let backend = match config.mode {
        ServiceMode::Agent => {
            let converser = GeminiConverser::from_config(config, events)?;
            ChatBackend::Agent(Arc::new(converser))
        }
        ServiceMode::Direct => ChatBackend::Direct(events),
    };

    Ok(AppState::new(backend))
}

/// Bind the listener and serve until a shutdown signal arrives
pub async fn serve(config: Config) -> miette::Result<()> {
    let state = build_state(&config)?;
    info!("Serving chat endpoint in {} mode", state.backend.mode());

    let app = api::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
