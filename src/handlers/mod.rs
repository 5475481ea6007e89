//! HTTP handlers

pub mod health;
pub mod predict;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Create the main router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::home))
        .route("/predict", post(predict::predict))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
