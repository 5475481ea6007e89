//! Features module - URL feature extraction engine
//!
//! The layout is the authoritative column schema; the extractor maps a raw
//! URL onto it and the optional content probe enriches a handful of
//! page-derived columns.

pub mod content;
pub mod layout;
pub mod url;
pub mod vector;

pub use layout::{feature_index, feature_name, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use url::extract;
pub use vector::FeatureVector;
