use anyhow::Context;
use gradebook_backend::{config::AppConfig, create_router, initialize_backend, logging};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, config.cors_origin.clone());

    info!("Starting server on {}", config.bind_addr);
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
