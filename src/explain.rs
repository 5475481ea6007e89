//! Per-prediction explainability
//!
//! Ranks features by how far the input deviates from the training
//! distribution (absolute standardized value) and reports the strongest
//! contributors. This is a cheap heuristic over data already computed for
//! inference, not an attribution method; it fills the optional
//! explainability block of the prediction response.

use serde::Serialize;

/// Deviations below this are noise, not signal.
const MIN_IMPORTANCE: f64 = 0.05;

/// Contributors reported per prediction.
const TOP_CONTRIBUTORS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub features: Vec<String>,
    pub importance: Vec<f64>,
}

/// Rank features by absolute standardized deviation.
///
/// Returns `None` when inputs are inconsistent or nothing deviates
/// meaningfully, in which case the response omits the block.
pub fn importance(names: &[String], standardized: &[f64]) -> Option<Explanation> {
    if names.len() != standardized.len() {
        return None;
    }

    let mut contributions: Vec<(&String, f64)> = names
        .iter()
        .zip(standardized.iter())
        .filter_map(|(name, &z)| {
            let magnitude = z.abs();
            (magnitude.is_finite() && magnitude > MIN_IMPORTANCE).then_some((name, magnitude))
        })
        .collect();

    if contributions.is_empty() {
        return None;
    }

    contributions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    contributions.truncate(TOP_CONTRIBUTORS);

    Some(Explanation {
        features: contributions.iter().map(|(name, _)| (*name).clone()).collect(),
        importance: contributions.iter().map(|(_, magnitude)| *magnitude).collect(),
    })
}
