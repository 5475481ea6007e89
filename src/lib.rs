//! Phishing URL detection: serving and offline training.
//!
//! The serving path is a deterministic pipeline over immutable artifacts:
//! extract features from the raw URL, standardize them with the
//! training-time scaler, and ask the boosted-tree classifier for the
//! probability that the URL is legitimate. The training path fits and
//! persists those artifacts from a labeled CSV dataset.

pub mod config;
pub mod error;
pub mod explain;
pub mod features;
pub mod handlers;
pub mod model;
pub mod state;
pub mod training;

pub use error::{AppError, AppResult};
pub use state::AppState;
