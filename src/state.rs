//! Shared application state
//!
//! Built once at startup and cloned into every handler. Artifact loading
//! failure is not fatal: the state then carries `None` and every prediction
//! request is answered with an unavailability error until the operator
//! fixes the artifacts and restarts.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::model::Artifacts;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub artifacts: Arc<Option<Artifacts>>,
    pub http: reqwest::Client,
}

impl AppState {
    /// Build state, attempting to load artifacts from the configured paths.
    pub fn new(config: Config) -> Self {
        let artifacts = match Artifacts::load(&config) {
            Ok(artifacts) => Some(artifacts),
            Err(e) => {
                tracing::warn!("model load error: {}", e);
                None
            }
        };

        Self::with_artifacts(config, artifacts)
    }

    /// Build state around pre-loaded (or deliberately absent) artifacts.
    pub fn with_artifacts(config: Config, artifacts: Option<Artifacts>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .expect("failed to build http client");

        Self {
            config,
            artifacts: Arc::new(artifacts),
            http,
        }
    }
}
