//! Prediction handler
//!
//! Orchestrates extract -> standardize -> classify and formats the verdict.
//! Artifacts are checked before the body so an unprovisioned deployment
//! reports unavailability for every prediction request.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::explain::{self, Explanation};
use crate::features::{self, content};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub result: &'static str,
    pub legitimate_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shap: Option<Explanation>,
}

pub async fn predict(
    State(state): State<AppState>,
    body: Option<Json<PredictRequest>>,
) -> AppResult<Json<PredictResponse>> {
    let artifacts = state
        .artifacts
        .as_ref()
        .as_ref()
        .ok_or(AppError::ModelNotLoaded)?;

    // A missing or malformed body folds into the same client error as a
    // missing or empty url field.
    let url = body
        .and_then(|Json(request)| request.url)
        .filter(|url| !url.is_empty())
        .ok_or(AppError::UrlRequired)?;

    let mut vector = features::extract(&url);
    if state.config.content_features {
        content::enrich(&mut vector, &url, &state.http).await;
    }

    let standardized = artifacts.scaler.standardize(&vector)?;
    let p_legitimate = artifacts.classifier.predict_legitimate(&standardized)?;

    let legitimate_percentage = round2(p_legitimate * 100.0);
    let result = verdict(legitimate_percentage);
    let shap = explain::importance(artifacts.scaler.feature_names(), &standardized);

    tracing::debug!(url = %url, result, legitimate_percentage, "prediction served");

    Ok(Json(PredictResponse {
        result,
        legitimate_percentage,
        shap,
    }))
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A tie at exactly 50.00 resolves to legitimate.
fn verdict(legitimate_percentage: f64) -> &'static str {
    if legitimate_percentage >= 50.0 {
        "legitimate"
    } else {
        "phishing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(53.4251), 53.43);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn test_verdict_threshold() {
        assert_eq!(verdict(50.0), "legitimate");
        assert_eq!(verdict(49.99), "phishing");
        assert_eq!(verdict(100.0), "legitimate");
        assert_eq!(verdict(0.0), "phishing");
    }
}
