//! Offline trainer
//!
//! Fits the scaler and classifier from a labeled CSV dataset and writes
//! the artifacts the server loads at startup.
//!
//! Usage: `train [dataset.csv]` (default: data/phishing.csv). Artifact
//! paths come from the same environment variables the server reads.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phishguard::config::Config;
use phishguard::training;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phishguard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let dataset_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/phishing.csv".to_string());

    let report = training::run(&dataset_path, &config)
        .with_context(|| format!("training from {dataset_path} failed"))?;

    tracing::info!(
        rows = report.rows,
        train_rows = report.train_rows,
        test_rows = report.test_rows,
        "training complete"
    );
    tracing::info!(
        iterations = report.best.iterations,
        max_depth = report.best.max_depth,
        shrinkage = report.best.shrinkage,
        "selected hyperparameters"
    );
    tracing::info!(
        accuracy = report.metrics.accuracy,
        precision = report.metrics.precision,
        recall = report.metrics.recall,
        f1 = report.metrics.f1,
        "held-out classification report"
    );

    Ok(())
}
