mod config;
mod protocol;
mod relay;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use config::Config;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Arc::new(Config::from_env());
    if config.credentials().is_none() {
        tracing::warn!(
            "Missing ALPACA_API_KEY or ALPACA_API_SECRET. Live prices will not work."
        );
    }

    let router = Router::new()
        .route("/stream", get(relay::stream_handler))
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(config.clone());

    tracing::info!("Portfolio Pulse running on http://{}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
