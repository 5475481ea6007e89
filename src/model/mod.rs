//! Model module - persisted artifacts and their adapters
//!
//! The trainer writes three artifacts: the boosted-tree model, the scaler
//! parameters, and the model metadata (label mapping + provenance). The
//! service loads all three once at startup; a failure leaves the service
//! running in a degraded state that answers every prediction with an
//! unavailability error.

pub mod classifier;
pub mod scaler;

use std::path::Path;

use gbdt::gradient_boost::GBDT;

use crate::config::Config;

pub use classifier::{Classifier, InferenceError, ModelMeta, LEGITIMATE, PHISHING};
pub use scaler::{ScalerParams, SchemaMismatch};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("model artifact {path} is unusable: {message}")]
    Model { path: String, message: String },
    #[error("{0}")]
    Layout(String),
    #[error("{0}")]
    Inference(#[from] InferenceError),
}

/// Read-only bundle of everything the prediction pipeline needs.
pub struct Artifacts {
    pub scaler: ScalerParams,
    pub classifier: Classifier,
}

impl Artifacts {
    /// Load model, scaler and metadata from the configured paths.
    pub fn load(config: &Config) -> Result<Self, ArtifactError> {
        let scaler = load_scaler(Path::new(&config.scaler_path))?;
        let model = load_model(&config.model_path)?;
        let meta = load_meta(Path::new(&config.model_meta_path))?;

        let classifier = Classifier::new(model, meta)?;
        tracing::info!(
            scaler = %config.scaler_path,
            model = %config.model_path,
            "model artifacts loaded"
        );

        Ok(Self { scaler, classifier })
    }
}

fn load_scaler(path: &Path) -> Result<ScalerParams, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.display().to_string()));
    }
    let scaler = ScalerParams::load(path).map_err(|e| ArtifactError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    scaler
        .validate()
        .map_err(|e| ArtifactError::Layout(e.to_string()))?;
    Ok(scaler)
}

fn load_model(path: &str) -> Result<GBDT, ArtifactError> {
    if !Path::new(path).exists() {
        return Err(ArtifactError::NotFound(path.to_string()));
    }
    GBDT::load_model(path).map_err(|e| ArtifactError::Model {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn load_meta(path: &Path) -> Result<ModelMeta, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.display().to_string()));
    }
    ModelMeta::load(path).map_err(|e| ArtifactError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            model_path: dir.path().join("model.json").display().to_string(),
            scaler_path: dir.path().join("scaler.json").display().to_string(),
            model_meta_path: dir.path().join("meta.json").display().to_string(),
            ..Config::default()
        };

        assert!(matches!(
            Artifacts::load(&config),
            Err(ArtifactError::NotFound(_))
        ));
    }
}
