//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::model::{InferenceError, SchemaMismatch};

pub type AppResult<T> = Result<T, AppError>;

/// Boundary error taxonomy.
///
/// Page-fetch failures inside feature extraction are not part of this
/// taxonomy; they degrade to default feature values and never reach the
/// caller.
#[derive(Debug)]
pub enum AppError {
    /// Request did not carry a usable URL (user fixable).
    UrlRequired,

    /// Artifacts were not loaded at startup (operator fixable).
    ModelNotLoaded,

    /// Extraction, standardization or inference failed.
    Pipeline(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::UrlRequired => (StatusCode::BAD_REQUEST, "URL required".to_string()),
            AppError::ModelNotLoaded => {
                tracing::error!("prediction requested but artifacts are not loaded");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Model not loaded".to_string(),
                )
            }
            AppError::Pipeline(msg) => {
                tracing::error!("prediction pipeline error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<SchemaMismatch> for AppError {
    fn from(err: SchemaMismatch) -> Self {
        AppError::Pipeline(err.to_string())
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::Pipeline(err.to_string())
    }
}
