//! Training module - offline pipeline
//!
//! Fits the scaler and the boosted-tree classifier from a labeled CSV
//! dataset and persists the artifacts the service loads at startup. The
//! boosting algorithm itself is the `gbdt` crate's; this module owns data
//! preparation, the hyperparameter search, evaluation and persistence.

pub mod dataset;
pub mod trainer;

pub use dataset::Dataset;
pub use trainer::{fit, run, GridPoint, Metrics, TrainParams, TrainReport, TrainedModel};

#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("failed to read dataset: {0}")]
    Csv(String),
    #[error("dataset has no label column (expected `status` or `label`)")]
    NoLabelColumn,
    #[error("dataset is missing feature column {0:?}")]
    MissingColumn(String),
    #[error("dataset is empty after preprocessing")]
    EmptyDataset,
    #[error("dataset must contain at least two distinct label values")]
    SingleClass,
    #[error("dataset too small to split: {0} rows")]
    TooSmall(usize),
    #[error("model error: {0}")]
    Model(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
