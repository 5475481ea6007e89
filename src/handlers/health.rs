//! Liveness handler

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HomeResponse {
    message: &'static str,
}

pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Phishing Detection API is running",
    })
}
