//! Feature vector - core data structure for classifier input
//!
//! A fixed-width numeric vector whose slots are defined by
//! [`super::layout::FEATURE_LAYOUT`]. All feature producers write through
//! named setters so a renamed or reordered column cannot be set silently.

use super::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT};

/// Feature values in the order defined by `FEATURE_LAYOUT`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Create a new zeroed feature vector.
    pub fn new() -> Self {
        Self {
            values: vec![0.0; FEATURE_COUNT],
        }
    }

    /// Get values as a slice, in layout order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by index.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name.
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Set feature by name. Returns false for an unknown name.
    pub fn set_by_name(&mut self, name: &str, value: f64) -> bool {
        if let Some(index) = feature_index(name) {
            self.values[index] = value;
            true
        } else {
            false
        }
    }

    /// Feature names for this vector.
    pub fn feature_names(&self) -> &'static [&'static str] {
        FEATURE_LAYOUT
    }

    /// Named values for logging.
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "named_values": FEATURE_LAYOUT
                .iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::HashMap<_, _>>(),
        })
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}
