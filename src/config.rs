//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Trained model artifact
    pub model_path: String,

    /// Scaler artifact
    pub scaler_path: String,

    /// Model metadata artifact (label mapping + provenance)
    pub model_meta_path: String,

    /// Enable the live page-content probe during extraction
    pub content_features: bool,

    /// Timeout for the content probe, in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            model_path: "models/phishing_model.json".to_string(),
            scaler_path: "models/scaler.json".to_string(),
            model_meta_path: "models/phishing_model.meta.json".to_string(),
            content_features: false,
            fetch_timeout_secs: 3,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH").unwrap_or(defaults.model_path),

            scaler_path: env::var("SCALER_PATH").unwrap_or(defaults.scaler_path),

            model_meta_path: env::var("MODEL_META_PATH").unwrap_or(defaults.model_meta_path),

            content_features: env::var("CONTENT_FEATURES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.content_features),

            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
        }
    }
}
