//! Dataset loading and preprocessing
//!
//! Reads the labeled CSV, selects the canonical feature columns by header
//! name, encodes the label, drops rows with missing or unparsable cells
//! and deduplicates exact repeats. Column selection is by name so extra
//! columns in the file (a raw `url` column, for instance) are ignored.

use std::collections::HashSet;
use std::path::Path;

use crate::features::FEATURE_LAYOUT;

use super::TrainError;

/// Label encoding: legitimate = 1, phishing = 0.
pub const LABEL_LEGITIMATE: u8 = 1;
pub const LABEL_PHISHING: u8 = 0;

/// A preprocessed, feature-aligned dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
}

impl Dataset {
    /// Load and preprocess a CSV dataset.
    pub fn from_csv(path: &Path) -> Result<Self, TrainError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| TrainError::Csv(e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| TrainError::Csv(e.to_string()))?
            .clone();

        let label_column = LabelColumn::locate(&headers)?;
        let feature_indices = locate_features(&headers)?;

        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut dropped_missing = 0usize;
        let mut dropped_duplicates = 0usize;
        let mut seen: HashSet<(Vec<u64>, u8)> = HashSet::new();

        for record in reader.records() {
            let record = record.map_err(|e| TrainError::Csv(e.to_string()))?;

            let Some(label) = label_column.encode(&record) else {
                dropped_missing += 1;
                continue;
            };
            let Some(row) = parse_row(&record, &feature_indices) else {
                dropped_missing += 1;
                continue;
            };

            let key = (row.iter().map(|v| v.to_bits()).collect(), label);
            if !seen.insert(key) {
                dropped_duplicates += 1;
                continue;
            }

            rows.push(row);
            labels.push(label);
        }

        tracing::info!(
            kept = rows.len(),
            dropped_missing,
            dropped_duplicates,
            "dataset loaded from {}",
            path.display()
        );

        let dataset = Self {
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            rows,
            labels,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Reject datasets a classifier cannot be fitted on.
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.rows.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        let distinct: HashSet<u8> = self.labels.iter().copied().collect();
        if distinct.len() < 2 {
            return Err(TrainError::SingleClass);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

enum LabelColumn {
    /// String `status` column: "legitimate" maps to 1, anything else to 0.
    Status(usize),
    /// Pre-encoded numeric `label` column.
    Numeric(usize),
}

impl LabelColumn {
    fn locate(headers: &csv::StringRecord) -> Result<Self, TrainError> {
        if let Some(idx) = position(headers, "status") {
            return Ok(Self::Status(idx));
        }
        if let Some(idx) = position(headers, "label") {
            return Ok(Self::Numeric(idx));
        }
        Err(TrainError::NoLabelColumn)
    }

    fn encode(&self, record: &csv::StringRecord) -> Option<u8> {
        match *self {
            Self::Status(idx) => {
                let cell = record.get(idx)?.trim();
                if cell.is_empty() {
                    return None;
                }
                Some(if cell == "legitimate" {
                    LABEL_LEGITIMATE
                } else {
                    LABEL_PHISHING
                })
            }
            Self::Numeric(idx) => {
                let value: f64 = record.get(idx)?.trim().parse().ok()?;
                Some(if value != 0.0 {
                    LABEL_LEGITIMATE
                } else {
                    LABEL_PHISHING
                })
            }
        }
    }
}

fn position(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn locate_features(headers: &csv::StringRecord) -> Result<Vec<usize>, TrainError> {
    FEATURE_LAYOUT
        .iter()
        .map(|name| position(headers, name).ok_or_else(|| TrainError::MissingColumn(name.to_string())))
        .collect()
}

/// Parse one record's feature cells; `None` drops the row.
fn parse_row(record: &csv::StringRecord, indices: &[usize]) -> Option<Vec<f64>> {
    let mut row = Vec::with_capacity(indices.len());
    for &idx in indices {
        let cell = record.get(idx)?.trim();
        if cell.is_empty() {
            return None;
        }
        let value: f64 = cell.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        row.push(value);
    }
    Some(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// CSV with the full canonical header plus url/status columns.
    fn write_csv(rows: &[(&str, &str)]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        let mut file = std::fs::File::create(&path).unwrap();

        let header: Vec<&str> = std::iter::once("url")
            .chain(FEATURE_LAYOUT.iter().copied())
            .chain(std::iter::once("status"))
            .collect();
        writeln!(file, "{}", header.join(",")).unwrap();

        for (url, status) in rows {
            let vector = crate::features::extract(url);
            let cells: Vec<String> = std::iter::once(url.to_string())
                .chain(vector.as_slice().iter().map(|v| v.to_string()))
                .chain(std::iter::once(status.to_string()))
                .collect();
            writeln!(file, "{}", cells.join(",")).unwrap();
        }

        (dir, path)
    }

    #[test]
    fn test_load_encodes_status_labels() {
        let (_dir, path) = write_csv(&[
            ("https://example.com", "legitimate"),
            ("http://1.2.3.4/login", "phishing"),
        ]);

        let dataset = Dataset::from_csv(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.labels, vec![LABEL_LEGITIMATE, LABEL_PHISHING]);
        assert_eq!(dataset.feature_names.len(), FEATURE_LAYOUT.len());
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let (_dir, path) = write_csv(&[
            ("https://example.com", "legitimate"),
            ("https://example.com", "legitimate"),
            ("http://1.2.3.4/login", "phishing"),
        ]);

        let dataset = Dataset::from_csv(&path).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_rows_with_missing_cells_are_dropped() {
        let (_dir, path) = write_csv(&[
            ("https://example.com", "legitimate"),
            ("http://1.2.3.4/login", "phishing"),
        ]);

        // Append a row with an empty feature cell.
        let mut content = std::fs::read_to_string(&path).unwrap();
        let mut broken: Vec<String> = std::iter::once("http://x.com".to_string())
            .chain((0..FEATURE_LAYOUT.len()).map(|_| String::new()))
            .chain(std::iter::once("phishing".to_string()))
            .collect();
        broken[1] = "1.0".to_string();
        content.push_str(&broken.join(","));
        content.push('\n');
        std::fs::write(&path, content).unwrap();

        let dataset = Dataset::from_csv(&path).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_single_class_rejected() {
        let (_dir, path) = write_csv(&[
            ("https://example.com", "legitimate"),
            ("https://rust-lang.org", "legitimate"),
        ]);

        assert!(matches!(
            Dataset::from_csv(&path),
            Err(TrainError::SingleClass)
        ));
    }

    #[test]
    fn test_missing_feature_column_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "length_url,status\n10,legitimate\n").unwrap();

        assert!(matches!(
            Dataset::from_csv(&path),
            Err(TrainError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_missing_label_column_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let header = FEATURE_LAYOUT.join(",");
        std::fs::write(&path, format!("{header}\n")).unwrap();

        assert!(matches!(
            Dataset::from_csv(&path),
            Err(TrainError::NoLabelColumn)
        ));
    }
}
