use city_events::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting city events service");

    // Load configuration
    let config = startup::load_config()?;

    // Serve until shutdown
    startup::serve(config).await
}
