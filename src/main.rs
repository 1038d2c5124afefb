use std::sync::Arc;

use threat_modeling_mcp::{
    build_app, config::Config, domain::tools::build_registry, logging,
    validation::ValidationLimits, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let registry = Arc::new(build_registry()?);
    let state = AppState::new(registry, ValidationLimits::default());
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_socket()?).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
