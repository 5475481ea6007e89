//! Feature standardization
//!
//! Per-column `(x - mean) / std` with parameters fixed at training time.
//! The params carry the canonical column ordering and a layout stamp; the
//! serving path selects and reorders vector entries by name to match, and
//! fails loudly instead of misaligning columns.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::features::layout::{validate_layout, LayoutInfo, LayoutMismatchError};
use crate::features::FeatureVector;

/// A required column is missing or the params are internally inconsistent.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaMismatch {
    #[error("feature column {0:?} is missing from the input vector")]
    MissingColumn(String),
    #[error("scaler holds {params} parameter rows for {columns} columns")]
    LengthMismatch { params: usize, columns: usize },
}

/// Per-feature standardization parameters plus the canonical ordering.
/// Immutable after training; persisted as a JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub layout: LayoutInfo,
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl ScalerParams {
    /// Fit mean and (population) standard deviation per column.
    pub fn fit(feature_names: Vec<String>, rows: &[Vec<f64>]) -> Self {
        let cols = feature_names.len();
        let n = rows.len() as f64;
        let mut mean = vec![0.0; cols];
        let mut std = vec![0.0; cols];

        if !rows.is_empty() {
            for row in rows {
                for (i, value) in row.iter().take(cols).enumerate() {
                    mean[i] += value;
                }
            }
            for m in &mut mean {
                *m /= n;
            }
            for row in rows {
                for (i, value) in row.iter().take(cols).enumerate() {
                    let d = value - mean[i];
                    std[i] += d * d;
                }
            }
            for s in &mut std {
                *s = (*s / n).sqrt();
            }
        }

        Self {
            layout: LayoutInfo::current(),
            feature_names,
            mean,
            std,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Check the stored layout stamp against the compiled schema.
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.layout.version, self.layout.hash)
    }

    /// Standardize a named feature vector into the canonical column order.
    ///
    /// Columns whose training-time std is 0 (or not finite) standardize to
    /// exactly 0 instead of dividing.
    pub fn standardize(&self, features: &FeatureVector) -> Result<Vec<f64>, SchemaMismatch> {
        self.check_lengths()?;

        let mut out = Vec::with_capacity(self.feature_names.len());
        for (i, name) in self.feature_names.iter().enumerate() {
            let value = features
                .get_by_name(name)
                .ok_or_else(|| SchemaMismatch::MissingColumn(name.clone()))?;
            out.push(self.scale_column(i, value));
        }
        Ok(out)
    }

    /// Standardize a row already in canonical column order.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, SchemaMismatch> {
        self.check_lengths()?;
        if row.len() != self.feature_names.len() {
            return Err(SchemaMismatch::LengthMismatch {
                params: self.feature_names.len(),
                columns: row.len(),
            });
        }

        Ok(row
            .iter()
            .enumerate()
            .map(|(i, &value)| self.scale_column(i, value))
            .collect())
    }

    fn scale_column(&self, i: usize, value: f64) -> f64 {
        let std = self.std[i];
        if std == 0.0 || !std.is_finite() {
            0.0
        } else {
            (value - self.mean[i]) / std
        }
    }

    fn check_lengths(&self) -> Result<(), SchemaMismatch> {
        let cols = self.feature_names.len();
        if self.mean.len() != cols || self.std.len() != cols {
            return Err(SchemaMismatch::LengthMismatch {
                params: self.mean.len().min(self.std.len()),
                columns: cols,
            });
        }
        Ok(())
    }

    /// Persist as a JSON artifact.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Load a persisted artifact.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_LAYOUT;

    fn canonical_names() -> Vec<String> {
        FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fit_mean_and_std() {
        let names = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let params = ScalerParams::fit(names, &rows);

        assert_eq!(params.mean, vec![2.0, 10.0]);
        assert_eq!(params.std, vec![1.0, 0.0]);
    }

    #[test]
    fn test_mean_vector_standardizes_to_zeros() {
        let params = ScalerParams::fit(
            vec!["a".to_string(), "b".to_string()],
            &[vec![2.0, 5.0], vec![4.0, 9.0]],
        );
        let z = params.transform_row(&[3.0, 7.0]).unwrap();
        assert_eq!(z, vec![0.0, 0.0]);
    }

    #[test]
    fn test_zero_std_column_is_zero_not_nan() {
        let params = ScalerParams::fit(
            vec!["a".to_string(), "b".to_string()],
            &[vec![1.0, 7.0], vec![2.0, 7.0]],
        );
        let z = params.transform_row(&[1.0, 123.0]).unwrap();
        assert!(z.iter().all(|x| x.is_finite()));
        assert_eq!(z[1], 0.0);
    }

    #[test]
    fn test_standardize_full_vector() {
        let vector = crate::features::extract("https://example.com");
        let rows = vec![vector.as_slice().to_vec(), vector.as_slice().to_vec()];
        let params = ScalerParams::fit(canonical_names(), &rows);

        // Identical rows: every std is 0, every output must be 0.
        let z = params.standardize(&vector).unwrap();
        assert_eq!(z.len(), FEATURE_LAYOUT.len());
        assert!(z.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_missing_column_fails_loudly() {
        let mut params = ScalerParams::fit(
            canonical_names(),
            &[vec![0.0; FEATURE_LAYOUT.len()], vec![1.0; FEATURE_LAYOUT.len()]],
        );
        params.feature_names[0] = "no_such_feature".to_string();

        let err = params
            .standardize(&crate::features::extract("https://example.com"))
            .unwrap_err();
        match err {
            SchemaMismatch::MissingColumn(name) => assert_eq!(name, "no_such_feature"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_row_length_mismatch() {
        let params = ScalerParams::fit(vec!["a".to_string()], &[vec![1.0], vec![2.0]]);
        assert!(matches!(
            params.transform_row(&[1.0, 2.0]),
            Err(SchemaMismatch::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_layout_stamp_round_trip() {
        let params = ScalerParams::fit(canonical_names(), &[vec![0.0; FEATURE_LAYOUT.len()]]);
        assert!(params.validate().is_ok());

        let mut stale = params;
        stale.layout.version += 1;
        assert!(stale.validate().is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");

        let params = ScalerParams::fit(
            vec!["a".to_string(), "b".to_string()],
            &[vec![1.0, 2.0], vec![3.0, 4.0]],
        );
        params.save(&path).unwrap();

        let loaded = ScalerParams::load(&path).unwrap();
        assert_eq!(loaded.mean, params.mean);
        assert_eq!(loaded.std, params.std);
        assert_eq!(loaded.feature_names, params.feature_names);
    }
}
