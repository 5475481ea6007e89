//! Phishing detection API server
//!
//! Loads the trained artifacts once at startup and serves predictions over
//! HTTP. A failed artifact load is logged and the server keeps running in
//! a degraded state that reports unavailability per request.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phishguard::config::Config;
use phishguard::handlers;
use phishguard::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phishguard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Phishing detection server starting...");

    let state = AppState::new(config.clone());
    if state.artifacts.is_none() {
        tracing::warn!(
            "serving without artifacts; run the trainer and restart to enable predictions"
        );
    }

    let app = handlers::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
