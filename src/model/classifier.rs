//! Classifier adapter - gradient boosted tree ensemble
//!
//! Wraps a trained GBDT and the metadata persisted next to it. The model's
//! single probability channel refers to whichever class the trainer
//! recorded as `positive_class`; the adapter orients the output from that
//! record instead of assuming a position.

use std::path::Path;

use chrono::{DateTime, Utc};
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};

pub const LEGITIMATE: &str = "legitimate";
pub const PHISHING: &str = "phishing";

#[derive(Debug, Clone, thiserror::Error)]
#[error("inference error: {0}")]
pub struct InferenceError(pub String);

/// Metadata persisted alongside the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Class labels known to the model.
    pub classes: Vec<String>,
    /// Class the raw probability channel refers to.
    pub positive_class: String,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub accuracy: f64,
    pub f1: f64,
    pub iterations: usize,
    pub max_depth: u32,
    pub shrinkage: f64,
}

impl ModelMeta {
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// The persisted label mapping must cover both known classes.
    pub fn validate(&self) -> Result<(), InferenceError> {
        for class in [LEGITIMATE, PHISHING] {
            if !self.classes.iter().any(|c| c == class) {
                return Err(InferenceError(format!(
                    "model metadata is missing class {class:?}"
                )));
            }
        }
        if !self.classes.iter().any(|c| *c == self.positive_class) {
            return Err(InferenceError(format!(
                "positive class {:?} is not among model classes",
                self.positive_class
            )));
        }
        Ok(())
    }
}

/// Immutable trained ensemble plus its label mapping.
pub struct Classifier {
    model: GBDT,
    meta: ModelMeta,
}

impl Classifier {
    pub fn new(model: GBDT, meta: ModelMeta) -> Result<Self, InferenceError> {
        meta.validate()?;
        Ok(Self { model, meta })
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// Probability that the sample is legitimate, in [0, 1].
    pub fn predict_legitimate(&self, standardized: &[f64]) -> Result<f64, InferenceError> {
        let features: Vec<ValueType> = standardized.iter().map(|&v| v as ValueType).collect();
        let batch: DataVec = vec![Data::new_test_data(features, None)];

        let predictions = self.model.predict(&batch);
        let raw = *predictions
            .first()
            .ok_or_else(|| InferenceError("model returned no prediction".to_string()))?
            as f64;
        let p_positive = raw.clamp(0.0, 1.0);

        // Orient via the persisted mapping, never by position.
        if self.meta.positive_class == LEGITIMATE {
            Ok(p_positive)
        } else {
            Ok(1.0 - p_positive)
        }
    }
}
