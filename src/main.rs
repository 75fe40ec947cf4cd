use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mensaplan::config::AppConfig;
use mensaplan::handlers;
use mensaplan::services::clock::SystemClock;
use mensaplan::services::source::http::HttpMenuSource;
use mensaplan::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    tracing::info!(
        url = %config.menu_url,
        timeout_secs = config.fetch_timeout_secs,
        "using menu page"
    );
    let source = HttpMenuSource::new(
        config.menu_url.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    )?;

    let state = Arc::new(AppState {
        source: Box::new(source),
        clock: Box::new(SystemClock),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/alexa", post(handlers::skill::alexa_webhook))
        .route("/mensa", get(handlers::mensa::today))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
