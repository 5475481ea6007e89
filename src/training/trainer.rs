//! Model fitting, evaluation and artifact persistence
//!
//! Seeded shuffle split, scaler fit on the training fold only, then a
//! small grid search over the boosting hyperparameters selecting by F1 on
//! the held-out fold. The winning model is persisted together with the
//! scaler and a metadata record carrying the label mapping.

use std::path::Path;

use chrono::Utc;
use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::Config;
use crate::model::{Artifacts, Classifier, ModelMeta, ScalerParams, LEGITIMATE, PHISHING};

use super::dataset::{Dataset, LABEL_LEGITIMATE};
use super::TrainError;

/// One hyperparameter combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub iterations: usize,
    pub max_depth: u32,
    pub shrinkage: f64,
}

/// Training options. The default grid is the one the production model is
/// tuned with; tests narrow it down to keep runtimes sane.
#[derive(Debug, Clone)]
pub struct TrainParams {
    pub grid: Vec<GridPoint>,
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for TrainParams {
    fn default() -> Self {
        let mut grid = Vec::new();
        for iterations in [200usize, 500] {
            for max_depth in [4u32, 6] {
                for shrinkage in [0.01f64, 0.1] {
                    grid.push(GridPoint {
                        iterations,
                        max_depth,
                        shrinkage,
                    });
                }
            }
        }
        Self {
            grid,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Held-out evaluation metrics, positive class = legitimate.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub best: GridPoint,
    pub metrics: Metrics,
}

/// Fitted artifacts not yet written to disk.
pub struct TrainedModel {
    pub scaler: ScalerParams,
    pub model: GBDT,
    pub meta: ModelMeta,
}

impl TrainedModel {
    /// Write the three artifacts to the configured paths.
    pub fn persist(&self, config: &Config) -> Result<(), TrainError> {
        for path in [&config.model_path, &config.scaler_path, &config.model_meta_path] {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        self.model
            .save_model(&config.model_path)
            .map_err(|e| TrainError::Model(e.to_string()))?;
        self.scaler.save(Path::new(&config.scaler_path))?;
        self.meta.save(Path::new(&config.model_meta_path))?;

        tracing::info!(
            model = %config.model_path,
            scaler = %config.scaler_path,
            meta = %config.model_meta_path,
            "artifacts persisted"
        );
        Ok(())
    }

    /// Assemble serving artifacts without a disk round-trip.
    pub fn into_artifacts(self) -> Result<Artifacts, TrainError> {
        let classifier =
            Classifier::new(self.model, self.meta).map_err(|e| TrainError::Model(e.to_string()))?;
        Ok(Artifacts {
            scaler: self.scaler,
            classifier,
        })
    }
}

/// Load, fit and persist in one step.
pub fn run(dataset_path: &str, config: &Config) -> Result<TrainReport, TrainError> {
    let dataset = Dataset::from_csv(Path::new(dataset_path))?;
    let (trained, report) = fit(&dataset, &TrainParams::default())?;
    trained.persist(config)?;
    Ok(report)
}

/// Fit scaler and classifier from a preprocessed dataset.
pub fn fit(dataset: &Dataset, params: &TrainParams) -> Result<(TrainedModel, TrainReport), TrainError> {
    dataset.validate()?;
    if params.grid.is_empty() {
        return Err(TrainError::Model("empty hyperparameter grid".to_string()));
    }

    let n = dataset.len();
    let test_rows = ((n as f64) * params.test_fraction).round() as usize;
    let test_rows = test_rows.clamp(1, n.saturating_sub(1));
    if n < 4 {
        return Err(TrainError::TooSmall(n));
    }
    let train_rows = n - test_rows;

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(params.seed);
    indices.shuffle(&mut rng);
    let (train_idx, test_idx) = indices.split_at(train_rows);

    let train_matrix: Vec<Vec<f64>> = train_idx.iter().map(|&i| dataset.rows[i].clone()).collect();
    let train_labels: Vec<u8> = train_idx.iter().map(|&i| dataset.labels[i]).collect();
    let test_labels: Vec<u8> = test_idx.iter().map(|&i| dataset.labels[i]).collect();

    let scaler = ScalerParams::fit(dataset.feature_names.clone(), &train_matrix);

    let train_scaled = transform_matrix(&scaler, &train_matrix)?;
    let test_scaled: Vec<Vec<f64>> = {
        let test_matrix: Vec<Vec<f64>> = test_idx.iter().map(|&i| dataset.rows[i].clone()).collect();
        transform_matrix(&scaler, &test_matrix)?
    };

    let train_data = training_data(&train_scaled, &train_labels);
    let test_data: DataVec = test_scaled
        .iter()
        .map(|row| Data::new_test_data(to_value_row(row), None))
        .collect();

    let feature_count = dataset.feature_names.len();
    let mut best: Option<(GridPoint, Metrics, GBDT)> = None;

    for &point in &params.grid {
        let model = fit_gbdt(&train_data, feature_count, point);
        let predicted = predict_labels(&model, &test_data);
        let metrics = evaluate(&test_labels, &predicted);

        tracing::info!(
            iterations = point.iterations,
            max_depth = point.max_depth,
            shrinkage = point.shrinkage,
            f1 = metrics.f1,
            accuracy = metrics.accuracy,
            "grid point evaluated"
        );

        let better = match &best {
            Some((_, current, _)) => metrics.f1 > current.f1,
            None => true,
        };
        if better {
            best = Some((point, metrics, model));
        }
    }

    let (best_point, metrics, model) =
        best.ok_or_else(|| TrainError::Model("grid search produced no model".to_string()))?;

    let meta = ModelMeta {
        classes: vec![PHISHING.to_string(), LEGITIMATE.to_string()],
        positive_class: LEGITIMATE.to_string(),
        trained_at: Utc::now(),
        training_rows: train_rows,
        accuracy: metrics.accuracy,
        f1: metrics.f1,
        iterations: best_point.iterations,
        max_depth: best_point.max_depth,
        shrinkage: best_point.shrinkage,
    };

    let report = TrainReport {
        rows: n,
        train_rows,
        test_rows,
        best: best_point,
        metrics,
    };

    Ok((
        TrainedModel {
            scaler,
            model,
            meta,
        },
        report,
    ))
}

fn transform_matrix(scaler: &ScalerParams, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, TrainError> {
    rows.iter()
        .map(|row| {
            scaler
                .transform_row(row)
                .map_err(|e| TrainError::Model(e.to_string()))
        })
        .collect()
}

fn to_value_row(row: &[f64]) -> Vec<ValueType> {
    row.iter().map(|&v| v as ValueType).collect()
}

/// Binary labels map to the +1/-1 targets the log-likelihood loss expects;
/// the positive target is the legitimate class.
fn training_data(rows: &[Vec<f64>], labels: &[u8]) -> DataVec {
    rows.iter()
        .zip(labels.iter())
        .map(|(row, &label)| {
            let target = if label == LABEL_LEGITIMATE { 1.0 } else { -1.0 };
            Data::new_training_data(to_value_row(row), 1.0, target, None)
        })
        .collect()
}

fn fit_gbdt(train_data: &DataVec, feature_count: usize, point: GridPoint) -> GBDT {
    let mut cfg = GbdtConfig::new();
    cfg.set_feature_size(feature_count);
    cfg.set_max_depth(point.max_depth);
    cfg.set_iterations(point.iterations);
    cfg.set_shrinkage(point.shrinkage as ValueType);
    cfg.set_loss("LogLikelyhood");

    let mut data = train_data.clone();
    let mut model = GBDT::new(&cfg);
    model.fit(&mut data);
    model
}

fn predict_labels(model: &GBDT, test_data: &DataVec) -> Vec<u8> {
    model
        .predict(test_data)
        .iter()
        .map(|&p| if p >= 0.5 { 1 } else { 0 })
        .collect()
}

/// Classification metrics with legitimate (1) as the positive class.
fn evaluate(truth: &[u8], predicted: &[u8]) -> Metrics {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut tn = 0usize;
    let mut fn_ = 0usize;

    for (&t, &p) in truth.iter().zip(predicted.iter()) {
        match (t, p) {
            (1, 1) => tp += 1,
            (0, 1) => fp += 1,
            (0, 0) => tn += 1,
            (1, 0) => fn_ += 1,
            _ => {}
        }
    }

    let total = truth.len().max(1) as f64;
    let accuracy = (tp + tn) as f64 / total;
    let precision = safe_div(tp as f64, (tp + fp) as f64);
    let recall = safe_div(tp as f64, (tp + fn_) as f64);
    let f1 = safe_div(2.0 * precision * recall, precision + recall);

    Metrics {
        accuracy,
        precision,
        recall,
        f1,
    }
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{extract, FEATURE_LAYOUT};
    use crate::training::dataset::{LABEL_LEGITIMATE, LABEL_PHISHING};

    const LEGITIMATE_URLS: &[&str] = &[
        "https://example.com",
        "https://www.rust-lang.org",
        "https://docs.rs/axum",
        "https://github.com/serde-rs/serde",
        "https://en.wikipedia.org/wiki/Phishing",
        "https://www.mozilla.org/en-US/",
        "https://crates.io/crates/tokio",
        "https://news.ycombinator.com",
        "https://duckduckgo.com/about",
        "https://www.bbc.co.uk/news",
        "https://stackoverflow.com/questions",
        "https://www.python.org/downloads/",
    ];

    const PHISHING_URLS: &[&str] = &[
        "http://192.168.4.21/login",
        "http://1.2.3.4/verify/account",
        "http://bit.ly/2x8Zq",
        "http://secure-login-paypal.com.example.ru/verify",
        "http://update-账号.xn--fiqs8s/login.php",
        "http://banking.example.com@10.0.0.8/secure",
        "http://tinyurl.com/confirm-identity",
        "http://free-prizes.win//claim.php?user=1&token=999",
        "http://paypal.com.secure-verify.info/login.html",
        "http://55.66.77.88:8081/webmail/verify",
        "http://login.micros0ft-support.com/reset",
        "http://account-verify.example.biz/secure/login.js",
    ];

    fn synthetic_dataset() -> Dataset {
        let mut rows = Vec::new();
        let mut labels = Vec::new();

        for url in LEGITIMATE_URLS {
            rows.push(extract(url).as_slice().to_vec());
            labels.push(LABEL_LEGITIMATE);
        }
        for url in PHISHING_URLS {
            rows.push(extract(url).as_slice().to_vec());
            labels.push(LABEL_PHISHING);
        }

        Dataset {
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            rows,
            labels,
        }
    }

    fn quick_params() -> TrainParams {
        TrainParams {
            grid: vec![GridPoint {
                iterations: 50,
                max_depth: 3,
                shrinkage: 0.1,
            }],
            test_fraction: 0.25,
            seed: 42,
        }
    }

    #[test]
    fn test_fit_produces_report_and_model() {
        let dataset = synthetic_dataset();
        let (trained, report) = fit(&dataset, &quick_params()).unwrap();

        assert_eq!(report.rows, dataset.len());
        assert_eq!(report.train_rows + report.test_rows, report.rows);
        assert!((0.0..=1.0).contains(&report.metrics.accuracy));
        assert!((0.0..=1.0).contains(&report.metrics.f1));
        assert_eq!(trained.meta.positive_class, LEGITIMATE);
        assert_eq!(trained.meta.training_rows, report.train_rows);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let dataset = synthetic_dataset();
        let (_, report_a) = fit(&dataset, &quick_params()).unwrap();
        let (_, report_b) = fit(&dataset, &quick_params()).unwrap();

        assert_eq!(report_a.metrics.accuracy, report_b.metrics.accuracy);
        assert_eq!(report_a.metrics.f1, report_b.metrics.f1);
        assert_eq!(report_a.best, report_b.best);
    }

    #[test]
    fn test_fit_rejects_single_class() {
        let mut dataset = synthetic_dataset();
        dataset.labels = vec![LABEL_LEGITIMATE; dataset.len()];
        assert!(matches!(
            fit(&dataset, &quick_params()),
            Err(TrainError::SingleClass)
        ));
    }

    #[test]
    fn test_fit_rejects_tiny_dataset() {
        let src = synthetic_dataset();
        let dataset = Dataset {
            feature_names: src.feature_names.clone(),
            rows: vec![
                src.rows[0].clone(),
                src.rows[1].clone(),
                src.rows[12].clone(),
            ],
            labels: vec![LABEL_LEGITIMATE, LABEL_LEGITIMATE, LABEL_PHISHING],
        };
        assert!(matches!(
            fit(&dataset, &quick_params()),
            Err(TrainError::TooSmall(_))
        ));
    }

    #[test]
    fn test_trained_model_predicts_in_range() {
        let dataset = synthetic_dataset();
        let (trained, _) = fit(&dataset, &quick_params()).unwrap();
        let artifacts = trained.into_artifacts().unwrap();

        let vector = extract("https://example.com");
        let standardized = artifacts.scaler.standardize(&vector).unwrap();
        let p = artifacts.classifier.predict_legitimate(&standardized).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_persist_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            model_path: dir.path().join("model.json").display().to_string(),
            scaler_path: dir.path().join("scaler.json").display().to_string(),
            model_meta_path: dir.path().join("meta.json").display().to_string(),
            ..Config::default()
        };

        let dataset = synthetic_dataset();
        let (trained, _) = fit(&dataset, &quick_params()).unwrap();
        trained.persist(&config).unwrap();

        let artifacts = Artifacts::load(&config).unwrap();
        let vector = extract("http://1.2.3.4/login");
        let standardized = artifacts.scaler.standardize(&vector).unwrap();
        let p = artifacts.classifier.predict_legitimate(&standardized).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_evaluate_metrics() {
        let truth = [1, 1, 0, 0, 1];
        let predicted = [1, 0, 0, 1, 1];
        let metrics = evaluate(&truth, &predicted);

        // tp = 2, fp = 1, tn = 1, fn = 1.
        assert!((metrics.accuracy - 0.6).abs() < 1e-12);
        assert!((metrics.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((metrics.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((metrics.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_degenerate_predictions() {
        let truth = [0, 0, 0];
        let predicted = [0, 0, 0];
        let metrics = evaluate(&truth, &predicted);

        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }
}
